//! Game mode stack
//!
//! Modes are registered once under an integer key and owned by the
//! machine's arena; the active stack only holds keys. Only the top mode is
//! updated each frame.
//!
//! A mode never touches the stack directly. It asks for a push or pop
//! through [`ModeContext`] and the machine applies the requests, in order,
//! once the hook that made them has returned.

mod boot;
mod editor;

use std::collections::{HashMap, VecDeque};

use log::debug;

pub use boot::BootMode;
pub use editor::EditorMode;

use crate::diagnostics::Diagnostics;
use crate::error::CoreError;
use crate::game::Registry;
use crate::input::InputContext;
use crate::video::Video;

/// Flags modes may flip for the driver to act on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameFlags {
    pub in_editor: bool,
    pub quit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Push(u32),
    Pop,
}

/// Everything a mode hook can see for one call.
pub struct ModeContext<'a> {
    pub ticks: u32,
    pub input: &'a InputContext,
    pub video: &'a mut Video,
    pub registry: &'a mut Registry,
    pub diagnostics: &'a mut Diagnostics,
    pub flags: &'a mut GameFlags,
    requests: VecDeque<Transition>,
}

impl<'a> ModeContext<'a> {
    pub fn new(
        ticks: u32,
        input: &'a InputContext,
        video: &'a mut Video,
        registry: &'a mut Registry,
        diagnostics: &'a mut Diagnostics,
        flags: &'a mut GameFlags,
    ) -> Self {
        Self {
            ticks,
            input,
            video,
            registry,
            diagnostics,
            flags,
            requests: VecDeque::new(),
        }
    }

    pub fn request_push(&mut self, key: u32) {
        self.requests.push_back(Transition::Push(key));
    }

    pub fn request_pop(&mut self) {
        self.requests.push_back(Transition::Pop);
    }

    pub fn pending_transitions(&self) -> usize {
        self.requests.len()
    }
}

pub trait Mode {
    fn name(&self) -> &str {
        "default"
    }

    fn enter(&mut self, _ctx: &mut ModeContext<'_>) -> Result<(), CoreError> {
        Ok(())
    }

    fn leave(&mut self, _ctx: &mut ModeContext<'_>) -> Result<(), CoreError> {
        Ok(())
    }

    fn update(&mut self, _ctx: &mut ModeContext<'_>) -> Result<(), CoreError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct StateMachine {
    modes: HashMap<u32, Box<dyn Mode>>,
    stack: Vec<u32>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the single instance for `key`. The factory is not called when
    /// the key is taken.
    pub fn register<F>(&mut self, key: u32, factory: F) -> Result<(), CoreError>
    where
        F: FnOnce() -> Box<dyn Mode>,
    {
        if self.modes.contains_key(&key) {
            return Err(CoreError::DuplicateState(key));
        }
        self.modes.insert(key, factory());
        Ok(())
    }

    pub fn find(&self, key: u32) -> Option<&dyn Mode> {
        self.modes.get(&key).map(|m| m.as_ref())
    }

    pub fn top(&self) -> Option<u32> {
        self.stack.last().copied()
    }

    pub fn top_name(&self) -> Option<&str> {
        self.top().and_then(|key| self.find(key)).map(|m| m.name())
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn push(&mut self, ctx: &mut ModeContext<'_>, key: u32) -> Result<(), CoreError> {
        let result = self.push_now(ctx, key);
        self.settle(ctx, result)
    }

    pub fn pop(&mut self, ctx: &mut ModeContext<'_>) -> Result<(), CoreError> {
        let result = self.pop_now(ctx);
        self.settle(ctx, result)
    }

    /// Run the top mode for one frame.
    pub fn update(&mut self, ctx: &mut ModeContext<'_>) -> Result<(), CoreError> {
        let result = match self.top() {
            Some(key) => self.mode_mut(key).and_then(|mode| mode.update(ctx)),
            None => Err(CoreError::EmptyStack),
        };
        self.settle(ctx, result)
    }

    /// Apply transitions queued on `ctx` outside of a mode hook.
    pub fn apply_pending(&mut self, ctx: &mut ModeContext<'_>) -> Result<(), CoreError> {
        self.settle(ctx, Ok(()))
    }

    /// Requests only survive a hook that succeeded.
    fn settle(&mut self, ctx: &mut ModeContext<'_>, result: Result<(), CoreError>) -> Result<(), CoreError> {
        match result {
            Ok(()) => self.apply_requests(ctx),
            Err(e) => {
                ctx.requests.clear();
                Err(e)
            }
        }
    }

    fn mode_mut(&mut self, key: u32) -> Result<&mut Box<dyn Mode>, CoreError> {
        self.modes.get_mut(&key).ok_or(CoreError::UnknownState(key))
    }

    fn push_now(&mut self, ctx: &mut ModeContext<'_>, key: u32) -> Result<(), CoreError> {
        if !self.modes.contains_key(&key) {
            return Err(CoreError::UnknownState(key));
        }

        if let Some(top) = self.top() {
            let mode = self.mode_mut(top)?;
            debug!("leave state: {}", mode.name());
            mode.leave(ctx)?;
        }

        self.stack.push(key);
        let mode = self.mode_mut(key)?;
        debug!("enter state: {}", mode.name());
        mode.enter(ctx)
    }

    fn pop_now(&mut self, ctx: &mut ModeContext<'_>) -> Result<(), CoreError> {
        let top = self.top().ok_or(CoreError::EmptyStack)?;
        let mode = self.mode_mut(top)?;
        debug!("leave state: {}", mode.name());
        mode.leave(ctx)?;
        self.stack.pop();

        let next = self.top().ok_or(CoreError::EmptyStack)?;
        let mode = self.mode_mut(next)?;
        debug!("enter state: {}", mode.name());
        mode.enter(ctx)
    }

    /// Drain transition requests, including any raised by the enter and
    /// leave hooks they trigger. The first failure drops the rest.
    fn apply_requests(&mut self, ctx: &mut ModeContext<'_>) -> Result<(), CoreError> {
        while let Some(request) = ctx.requests.pop_front() {
            let result = match request {
                Transition::Push(key) => self.push_now(ctx, key),
                Transition::Pop => self.pop_now(ctx),
            };
            if let Err(e) = result {
                ctx.requests.clear();
                return Err(e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Records every hook call; optionally fails one hook or requests a
    /// transition from `update`.
    struct Recorder {
        name: &'static str,
        log: Log,
        fail_on: Option<&'static str>,
        on_update: Option<Transition>,
    }

    impl Recorder {
        fn boxed(name: &'static str, log: &Log) -> Box<dyn Mode> {
            Box::new(Recorder { name, log: log.clone(), fail_on: None, on_update: None })
        }

        fn hook(&self, hook: &'static str) -> Result<(), CoreError> {
            self.log.borrow_mut().push(format!("{}:{}", hook, self.name));
            if self.fail_on == Some(hook) {
                return Err(CoreError::Sound(format!("{} failed", hook)));
            }
            Ok(())
        }
    }

    impl Mode for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn enter(&mut self, _ctx: &mut ModeContext<'_>) -> Result<(), CoreError> {
            self.hook("enter")
        }

        fn leave(&mut self, _ctx: &mut ModeContext<'_>) -> Result<(), CoreError> {
            self.hook("leave")
        }

        fn update(&mut self, ctx: &mut ModeContext<'_>) -> Result<(), CoreError> {
            match self.on_update {
                Some(Transition::Push(key)) => ctx.request_push(key),
                Some(Transition::Pop) => ctx.request_pop(),
                None => {}
            }
            self.hook("update")
        }
    }

    struct Unnamed;
    impl Mode for Unnamed {}

    fn new_log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn test_register_rejects_duplicate_key() {
        let mut machine = StateMachine::new();
        machine.register(1, || Box::new(Unnamed)).unwrap();

        let mut called = false;
        let err = machine
            .register(1, || {
                called = true;
                Box::new(Unnamed)
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateState(1)));
        assert!(!called);
        assert_eq!(machine.find(1).unwrap().name(), "default");
    }

    #[test]
    fn test_push_and_pop_depth() {
        let mut h = Harness::new();
        let log = new_log();
        let mut machine = StateMachine::new();
        machine.register(1, || Recorder::boxed("a", &log)).unwrap();
        machine.register(2, || Recorder::boxed("b", &log)).unwrap();

        let mut ctx = h.mode_ctx(0);
        machine.push(&mut ctx, 1).unwrap();
        machine.push(&mut ctx, 2).unwrap();
        assert_eq!(machine.depth(), 2);
        assert_eq!(machine.top(), Some(2));

        machine.pop(&mut ctx).unwrap();
        assert_eq!(machine.depth(), 1);
        assert_eq!(machine.top_name(), Some("a"));

        assert_eq!(
            *log.borrow(),
            vec!["enter:a", "leave:a", "enter:b", "leave:b", "enter:a"]
        );
    }

    #[test]
    fn test_push_unknown_key_leaves_stack() {
        let mut h = Harness::new();
        let log = new_log();
        let mut machine = StateMachine::new();
        machine.register(1, || Recorder::boxed("a", &log)).unwrap();

        let mut ctx = h.mode_ctx(0);
        machine.push(&mut ctx, 1).unwrap();
        let err = machine.push(&mut ctx, 99).unwrap_err();
        assert!(matches!(err, CoreError::UnknownState(99)));
        assert_eq!(err.code(), "G401");
        assert_eq!(machine.depth(), 1);
        assert_eq!(*log.borrow(), vec!["enter:a"], "no leave on a failed lookup");
    }

    #[test]
    fn test_leave_failure_aborts_push() {
        let mut h = Harness::new();
        let log = new_log();
        let mut machine = StateMachine::new();
        let l = log.clone();
        machine
            .register(1, move || Box::new(Recorder { name: "a", log: l, fail_on: Some("leave"), on_update: None }))
            .unwrap();
        machine.register(2, || Recorder::boxed("b", &log)).unwrap();

        let mut ctx = h.mode_ctx(0);
        machine.push(&mut ctx, 1).unwrap();
        assert!(machine.push(&mut ctx, 2).is_err());
        assert_eq!(machine.top(), Some(1));
        assert_eq!(machine.depth(), 1);
    }

    #[test]
    fn test_leave_failure_aborts_pop() {
        let mut h = Harness::new();
        let log = new_log();
        let mut machine = StateMachine::new();
        machine.register(1, || Recorder::boxed("a", &log)).unwrap();
        let l = log.clone();
        machine
            .register(2, move || Box::new(Recorder { name: "b", log: l, fail_on: Some("leave"), on_update: None }))
            .unwrap();

        let mut ctx = h.mode_ctx(0);
        machine.push(&mut ctx, 1).unwrap();
        machine.push(&mut ctx, 2).unwrap();
        log.borrow_mut().clear();

        assert!(machine.pop(&mut ctx).is_err());
        assert_eq!(machine.depth(), 2);
        assert_eq!(machine.top(), Some(2));
        assert_eq!(*log.borrow(), vec!["leave:b"], "a is not re-entered");
    }

    #[test]
    fn test_failed_update_discards_its_requests() {
        let mut h = Harness::new();
        let log = new_log();
        let mut machine = StateMachine::new();
        let l = log.clone();
        machine
            .register(1, move || {
                Box::new(Recorder { name: "a", log: l, fail_on: Some("update"), on_update: Some(Transition::Push(2)) })
            })
            .unwrap();
        machine.register(2, || Recorder::boxed("b", &log)).unwrap();
        machine.register(3, || Recorder::boxed("c", &log)).unwrap();

        let mut ctx = h.mode_ctx(0);
        machine.push(&mut ctx, 1).unwrap();
        assert!(machine.update(&mut ctx).is_err());
        assert_eq!(ctx.pending_transitions(), 0);
        assert_eq!(machine.top(), Some(1));

        machine.push(&mut ctx, 3).unwrap();
        assert_eq!(machine.top(), Some(3));
        assert_eq!(machine.depth(), 2);
    }

    #[test]
    fn test_requests_dropped_on_empty_stack() {
        let mut h = Harness::new();
        let mut machine = StateMachine::new();
        machine.register(1, || Box::new(Unnamed)).unwrap();

        let mut ctx = h.mode_ctx(0);
        ctx.request_push(1);
        assert!(matches!(machine.update(&mut ctx), Err(CoreError::EmptyStack)));
        assert_eq!(ctx.pending_transitions(), 0);
        assert_eq!(machine.depth(), 0);

        ctx.request_push(1);
        machine.apply_pending(&mut ctx).unwrap();
        assert_eq!(machine.top(), Some(1));
    }

    #[test]
    fn test_enter_failure_keeps_mode_on_stack() {
        let mut h = Harness::new();
        let log = new_log();
        let mut machine = StateMachine::new();
        let l = log.clone();
        machine
            .register(1, move || Box::new(Recorder { name: "a", log: l, fail_on: Some("enter"), on_update: None }))
            .unwrap();

        let mut ctx = h.mode_ctx(0);
        assert!(machine.push(&mut ctx, 1).is_err());
        assert_eq!(machine.depth(), 1);
    }

    #[test]
    fn test_pop_to_empty_is_an_error() {
        let mut h = Harness::new();
        let log = new_log();
        let mut machine = StateMachine::new();
        machine.register(1, || Recorder::boxed("a", &log)).unwrap();

        let mut ctx = h.mode_ctx(0);
        assert!(matches!(machine.pop(&mut ctx), Err(CoreError::EmptyStack)));

        machine.push(&mut ctx, 1).unwrap();
        let err = machine.pop(&mut ctx).unwrap_err();
        assert!(matches!(err, CoreError::EmptyStack));
        assert_eq!(err.to_string(), "the game state stack must not be empty.");
        assert_eq!(machine.depth(), 0);
        assert!(matches!(machine.update(&mut ctx), Err(CoreError::EmptyStack)));
    }

    #[test]
    fn test_update_only_runs_top() {
        let mut h = Harness::new();
        let log = new_log();
        let mut machine = StateMachine::new();
        machine.register(1, || Recorder::boxed("a", &log)).unwrap();
        machine.register(2, || Recorder::boxed("b", &log)).unwrap();

        let mut ctx = h.mode_ctx(0);
        machine.push(&mut ctx, 1).unwrap();
        machine.push(&mut ctx, 2).unwrap();
        log.borrow_mut().clear();

        machine.update(&mut ctx).unwrap();
        assert_eq!(*log.borrow(), vec!["update:b"]);
    }

    #[test]
    fn test_transition_requested_from_update_applies_after_hook() {
        let mut h = Harness::new();
        let log = new_log();
        let mut machine = StateMachine::new();
        let l = log.clone();
        machine
            .register(1, move || {
                Box::new(Recorder { name: "a", log: l, fail_on: None, on_update: Some(Transition::Push(2)) })
            })
            .unwrap();
        machine.register(2, || Recorder::boxed("b", &log)).unwrap();

        let mut ctx = h.mode_ctx(0);
        machine.push(&mut ctx, 1).unwrap();
        log.borrow_mut().clear();

        machine.update(&mut ctx).unwrap();
        assert_eq!(*log.borrow(), vec!["update:a", "leave:a", "enter:b"]);
        assert_eq!(machine.top(), Some(2));
        assert_eq!(ctx.pending_transitions(), 0);
    }

    #[test]
    fn test_failed_request_drops_the_rest() {
        let mut h = Harness::new();
        let mut machine = StateMachine::new();
        machine.register(1, || Box::new(Unnamed)).unwrap();

        let mut ctx = h.mode_ctx(0);
        machine.push(&mut ctx, 1).unwrap();
        ctx.request_push(42);
        ctx.request_pop();
        assert!(matches!(machine.update(&mut ctx), Err(CoreError::UnknownState(42))));
        assert_eq!(ctx.pending_transitions(), 0);
        assert_eq!(machine.depth(), 1);
    }
}
