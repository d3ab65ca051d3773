//! Timer scheduler
//!
//! A timer is a component on an entity: a duration, an expiry tick and an
//! optional callback. Each frame `update` fires every active timer whose
//! expiry is strictly behind the current tick. The callback's return value
//! decides what happens next:
//!
//! - `Ok(true)`: reschedule to `now + duration` (relative to the current
//!   tick, so a long frame pushes every timer back by the same amount)
//! - `Ok(false)`: kill the timer
//! - `Err(_)`: stop processing and hand the error to the frame loop
//!
//! Killing a standalone timer despawns its entity; a timer attached to an
//! existing entity is only deactivated and the entity lives on.
//!
//! Callbacks cannot reach the registry while the pass holds it. Timer starts
//! and stops they ask for are queued on the [`TimerContext`] and applied, in
//! order, once every due timer has run. Mode transitions are handed to the
//! frame driver the same way.

use log::debug;

use crate::diagnostics::Diagnostics;
use crate::error::CoreError;
use crate::game::{Entity, Registry};
use crate::input::InputContext;
use crate::state::{GameFlags, Transition};
use crate::video::Video;

enum TimerCommand {
    Start {
        duration: u32,
        callback: Option<TimerCallback>,
        entity: Option<Entity>,
    },
    Stop(Entity),
}

/// What a callback can touch while it runs.
pub struct TimerContext<'a> {
    pub ticks: u32,
    pub input: &'a InputContext,
    pub video: &'a mut Video,
    pub diagnostics: &'a mut Diagnostics,
    pub flags: &'a mut GameFlags,
    commands: Vec<TimerCommand>,
    transitions: Vec<Transition>,
}

impl<'a> TimerContext<'a> {
    pub fn new(
        ticks: u32,
        input: &'a InputContext,
        video: &'a mut Video,
        diagnostics: &'a mut Diagnostics,
        flags: &'a mut GameFlags,
    ) -> Self {
        Self {
            ticks,
            input,
            video,
            diagnostics,
            flags,
            commands: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Start a timer once the current pass ends. It expires `duration`
    /// ticks after this pass's tick.
    pub fn start_timer(&mut self, duration: u32, callback: Option<TimerCallback>, entity: Option<Entity>) {
        self.commands.push(TimerCommand::Start { duration, callback, entity });
    }

    /// Stop the timer on `entity` once the current pass ends.
    pub fn stop_timer(&mut self, entity: Entity) {
        self.commands.push(TimerCommand::Stop(entity));
    }

    pub fn request_push(&mut self, key: u32) {
        self.transitions.push(Transition::Push(key));
    }

    pub fn request_pop(&mut self) {
        self.transitions.push(Transition::Pop);
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Mode transitions raised by callbacks, in the order they were asked for.
    pub fn take_transitions(&mut self) -> Vec<Transition> {
        std::mem::take(&mut self.transitions)
    }
}

pub type TimerCallback =
    Box<dyn FnMut(&Timer, &mut TimerContext<'_>) -> Result<bool, CoreError>>;

/// Box a closure as a timer callback.
pub fn callback<F>(f: F) -> Option<TimerCallback>
where
    F: FnMut(&Timer, &mut TimerContext<'_>) -> Result<bool, CoreError> + 'static,
{
    Some(Box::new(f))
}

pub struct Timer {
    active: bool,
    expiry: u32,
    duration: u32,
    callback: Option<TimerCallback>,
    standalone: bool,
}

impl Timer {
    pub(crate) fn new(now: u32, duration: u32, callback: Option<TimerCallback>, standalone: bool) -> Self {
        Self {
            active: true,
            expiry: now.wrapping_add(duration),
            duration,
            callback,
            standalone,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Tick after which the timer fires.
    pub fn expiry(&self) -> u32 {
        self.expiry
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn is_standalone(&self) -> bool {
        self.standalone
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }
}

impl std::fmt::Debug for Timer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timer")
            .field("active", &self.active)
            .field("expiry", &self.expiry)
            .field("duration", &self.duration)
            .field("callback", &self.callback.is_some())
            .field("standalone", &self.standalone)
            .finish()
    }
}

/// Start a timer that expires `duration` ticks after `now`.
///
/// With no `entity` a fresh standalone entity is spawned to own the timer.
/// Any timer already on the entity is replaced.
pub fn start(
    registry: &mut Registry,
    now: u32,
    duration: u32,
    callback: Option<TimerCallback>,
    entity: Option<Entity>,
) -> Result<Entity, CoreError> {
    let (entity, standalone) = match entity {
        Some(e) if registry.is_alive(e) => (e, false),
        Some(e) => return Err(CoreError::UnknownEntity(e)),
        None => (registry.spawn(), true),
    };

    registry
        .timers
        .insert(entity, Timer::new(now, duration, callback, standalone));
    Ok(entity)
}

/// Remove the timer from `entity` without running its callback.
/// Standalone owners are despawned along with it.
pub fn stop(registry: &mut Registry, entity: Entity) -> bool {
    match registry.timer(entity).map(|t| t.standalone) {
        Some(true) => registry.despawn(entity),
        Some(false) => registry.timers.remove(entity).is_some(),
        None => false,
    }
}

/// Fire every due timer, then apply the starts and stops the callbacks
/// queued. Fails fast on the first callback error, dropping everything the
/// pass queued.
pub fn update(registry: &mut Registry, ctx: &mut TimerContext<'_>) -> Result<(), CoreError> {
    let result = fire_due(registry, ctx).and_then(|()| apply_commands(registry, ctx));
    if result.is_err() {
        ctx.commands.clear();
        ctx.transitions.clear();
    }
    result
}

fn fire_due(registry: &mut Registry, ctx: &mut TimerContext<'_>) -> Result<(), CoreError> {
    let now = ctx.ticks;

    for entity in registry.timer_entities() {
        let Some(timer) = registry.timers.get_mut(entity) else { continue };

        if !timer.active || now <= timer.expiry {
            continue;
        }

        let keep = match timer.callback.take() {
            None => false,
            Some(mut cb) => {
                let outcome = cb(timer, ctx);
                timer.callback = Some(cb);
                outcome?
            }
        };

        if keep {
            timer.expiry = now.wrapping_add(timer.duration);
        } else if timer.standalone {
            registry.despawn(entity);
        } else {
            timer.active = false;
        }
    }

    Ok(())
}

fn apply_commands(registry: &mut Registry, ctx: &mut TimerContext<'_>) -> Result<(), CoreError> {
    for command in std::mem::take(&mut ctx.commands) {
        match command {
            TimerCommand::Start { duration, callback, entity } => {
                let e = start(registry, ctx.ticks, duration, callback, entity)?;
                debug!("timer started from callback on {:?}", e);
            }
            TimerCommand::Stop(entity) => {
                stop(registry, entity);
            }
        }
    }
    Ok(())
}
