//! Session wrappers around the native event sources
//!
//! A session pulls one batch per iteration tick from its [`EventSource`] and
//! hands it to the matching dispatcher together with the caller's state. The
//! protocol session also owns the on-close registry that dependent sessions
//! (such as audio/video) hook into, so that closing the protocol session
//! tears everything down in registration order.

use crate::call_state::CallStateFlags;
use crate::dispatch;
use crate::listener::{AvEventListener, CoreEventListener};
use crate::registry::{CallbackId, CallbackRegistry};
use crate::types::{DispatchError, FriendNumber, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Native producer of event batches
pub trait EventSource {
    /// Run one native iteration and return the events it produced, if any
    fn iterate(&mut self) -> Option<Vec<u8>>;

    /// Release the native instance
    fn kill(&mut self);
}

/// Native consumer of locally originated call-state changes
pub trait CallStateSink {
    fn invoke_call_state(&mut self, friend_number: FriendNumber, call_state: u32);
}

/// On-close registry shared with dependent sessions; `None` once closed
type SharedRegistry = Arc<Mutex<Option<CallbackRegistry>>>;

/// Protocol session
pub struct CoreSession<B: EventSource> {
    backend: B,
    on_close: SharedRegistry,
}

impl<B: EventSource> CoreSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            on_close: Arc::new(Mutex::new(Some(CallbackRegistry::new()))),
        }
    }

    /// Run one iteration and dispatch its events through `listener`
    pub fn iterate<S, L>(&mut self, listener: &mut L, state: S) -> Result<S>
    where
        L: CoreEventListener<S> + ?Sized,
    {
        if self.is_closed() {
            return Err(DispatchError::SessionClosed);
        }
        let batch = self.backend.iterate();
        dispatch::protocol::dispatch(listener, batch.as_deref(), state)
    }

    /// Run `callback` once when this session closes
    ///
    /// Fails with [`DispatchError::SessionClosed`] after the session has
    /// closed.
    pub fn add_on_close_callback<F>(&self, callback: F) -> Result<CallbackId>
    where
        F: FnMut() + Send + 'static,
    {
        self.on_close
            .lock()
            .as_mut()
            .map(|registry| registry.add(callback))
            .ok_or(DispatchError::SessionClosed)
    }

    /// Ignored once the session has closed
    pub fn remove_on_close_callback(&self, id: CallbackId) {
        remove_from(&self.on_close, id);
    }

    pub fn is_closed(&self) -> bool {
        self.on_close.lock().is_none()
    }

    /// Run the on-close callbacks, then release the native instance
    ///
    /// The registry is detached before any callback runs, so callbacks may
    /// unregister themselves; such removals are ignored. Closing twice is a
    /// no-op.
    pub fn close(&mut self) {
        let Some(mut callbacks) = self.on_close.lock().take() else {
            return;
        };
        log::debug!("Closing session, running {} on-close callback(s)", callbacks.len());
        callbacks.invoke();
        self.backend.kill();
    }
}

impl<B: EventSource> Drop for CoreSession<B> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Audio/video session layered on a protocol session
///
/// Closes itself when the protocol session closes.
pub struct AvSession<B>
where
    B: EventSource + CallStateSink + Send + 'static,
{
    backend: Arc<Mutex<B>>,
    killed: Arc<AtomicBool>,
    core_on_close: SharedRegistry,
    on_close: Option<CallbackId>,
}

impl<B> AvSession<B>
where
    B: EventSource + CallStateSink + Send + 'static,
{
    pub fn new<C: EventSource>(core: &CoreSession<C>, backend: B) -> Result<Self> {
        let backend = Arc::new(Mutex::new(backend));
        let killed = Arc::new(AtomicBool::new(false));

        let on_close = {
            let backend = Arc::clone(&backend);
            let killed = Arc::clone(&killed);
            core.add_on_close_callback(move || kill_once(&backend, &killed))?
        };

        Ok(Self {
            backend,
            killed,
            core_on_close: Arc::clone(&core.on_close),
            on_close: Some(on_close),
        })
    }

    /// Run one iteration and dispatch its events through `listener`
    pub fn iterate<S, L>(&mut self, listener: &mut L, state: S) -> Result<S>
    where
        L: AvEventListener<S> + ?Sized,
    {
        if self.is_closed() {
            return Err(DispatchError::SessionClosed);
        }
        let batch = self.backend.lock().iterate();
        dispatch::av::dispatch(listener, batch.as_deref(), state)
    }

    /// Push a local call-state change across the native boundary
    pub fn invoke_call_state(
        &self,
        friend_number: FriendNumber,
        call_state: CallStateFlags,
    ) -> Result<()> {
        if self.is_closed() {
            return Err(DispatchError::SessionClosed);
        }
        self.backend
            .lock()
            .invoke_call_state(friend_number, call_state.encode());
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.killed.load(Ordering::Acquire)
    }

    /// Unregister from the protocol session and release the native instance
    pub fn close(&mut self) {
        if let Some(id) = self.on_close.take() {
            remove_from(&self.core_on_close, id);
        }
        kill_once(&self.backend, &self.killed);
    }
}

impl<B> Drop for AvSession<B>
where
    B: EventSource + CallStateSink + Send + 'static,
{
    fn drop(&mut self) {
        self.close();
    }
}

fn remove_from(registry: &Mutex<Option<CallbackRegistry>>, id: CallbackId) {
    match registry.lock().as_mut() {
        Some(registry) => registry.remove(id),
        None => log::debug!("Session already closed, ignoring removal of slot {}", id.index()),
    }
}

fn kill_once<B: EventSource>(backend: &Mutex<B>, killed: &AtomicBool) {
    if !killed.swap(true, Ordering::AcqRel) {
        backend.lock().kill();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto;
    use prost::Message;
    use std::collections::VecDeque;

    /// Replays canned batches and records what the session asked of it
    #[derive(Default)]
    struct FakeSource {
        batches: VecDeque<Option<Vec<u8>>>,
        kills: Arc<Mutex<Vec<&'static str>>>,
        name: &'static str,
        pushed: Vec<(u32, u32)>,
    }

    impl EventSource for FakeSource {
        fn iterate(&mut self) -> Option<Vec<u8>> {
            self.batches.pop_front().flatten()
        }

        fn kill(&mut self) {
            self.kills.lock().push(self.name);
        }
    }

    impl CallStateSink for FakeSource {
        fn invoke_call_state(&mut self, friend_number: FriendNumber, call_state: u32) {
            self.pushed.push((friend_number.value(), call_state));
        }
    }

    struct Typing;

    impl CoreEventListener<u32> for Typing {
        fn friend_typing(&mut self, _friend_number: FriendNumber, is_typing: bool, state: u32) -> u32 {
            if is_typing {
                state + 1
            } else {
                state
            }
        }
    }

    impl AvEventListener<u32> for Typing {}

    #[test]
    fn test_core_iterate_threads_state_across_ticks() {
        let typing = proto::CoreEvents {
            friend_typing: vec![proto::FriendTyping { friend_number: 0, is_typing: true }],
            ..Default::default()
        };
        let source = FakeSource {
            batches: VecDeque::from(vec![
                Some(typing.encode_to_vec()),
                None,
                Some(typing.encode_to_vec()),
            ]),
            ..Default::default()
        };
        let mut session = CoreSession::new(source);

        let state = session.iterate(&mut Typing, 0).unwrap();
        let state = session.iterate(&mut Typing, state).unwrap();
        let state = session.iterate(&mut Typing, state).unwrap();
        assert_eq!(state, 2);
    }

    #[test]
    fn test_core_close_runs_callbacks_then_kills() {
        let kills = Arc::new(Mutex::new(Vec::new()));
        let mut session = CoreSession::new(FakeSource {
            kills: Arc::clone(&kills),
            name: "core",
            ..Default::default()
        });

        let log = Arc::clone(&kills);
        session
            .add_on_close_callback(move || log.lock().push("callback"))
            .unwrap();

        session.close();
        session.close();
        assert_eq!(*kills.lock(), vec!["callback", "core"]);
        assert!(matches!(
            session.iterate(&mut Typing, 0),
            Err(DispatchError::SessionClosed)
        ));
    }

    #[test]
    fn test_core_close_closes_av_once() {
        let kills = Arc::new(Mutex::new(Vec::new()));
        let mut core = CoreSession::new(FakeSource {
            kills: Arc::clone(&kills),
            name: "core",
            ..Default::default()
        });
        let mut av = AvSession::new(
            &core,
            FakeSource { kills: Arc::clone(&kills), name: "av", ..Default::default() },
        )
        .unwrap();

        core.close();
        assert!(av.is_closed());
        av.close();
        assert_eq!(*kills.lock(), vec!["av", "core"]);
        assert!(matches!(av.iterate(&mut Typing, 0), Err(DispatchError::SessionClosed)));
    }

    #[test]
    fn test_av_close_unregisters_from_core() {
        let core = CoreSession::new(FakeSource::default());
        let mut av = AvSession::new(&core, FakeSource::default()).unwrap();
        assert_eq!(core.on_close.lock().as_ref().map(CallbackRegistry::len), Some(1));

        av.close();
        assert_eq!(core.on_close.lock().as_ref().map(CallbackRegistry::slot_count), Some(0));
    }

    #[test]
    fn test_closed_session_rejects_callbacks() {
        let mut core = CoreSession::new(FakeSource::default());
        let mut av = AvSession::new(&core, FakeSource::default()).unwrap();
        core.close();

        let ran = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&ran);
        let late = core.add_on_close_callback(move || *counter.lock() += 1);
        assert!(matches!(late, Err(DispatchError::SessionClosed)));

        // The AV session's stale handle must not reach any registry
        av.close();
        core.close();
        assert!(core.is_closed());
        assert_eq!(*ran.lock(), 0);
        assert!(matches!(
            AvSession::new(&core, FakeSource::default()),
            Err(DispatchError::SessionClosed)
        ));
    }

    #[test]
    fn test_av_pushes_encoded_call_state() {
        let core = CoreSession::new(FakeSource::default());
        let av = AvSession::new(&core, FakeSource::default()).unwrap();

        av.invoke_call_state(
            FriendNumber(7),
            CallStateFlags::SENDING_AUDIO | CallStateFlags::ACCEPTING_VIDEO,
        )
        .unwrap();
        assert_eq!(av.backend.lock().pushed, vec![(7, 0b100100)]);
    }
}
