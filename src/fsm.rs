//! Finite-state machine driving one actor's behaviors.
//!
//! States are constructed once per actor and cycle through enter/exit many
//! times. The machine owns them through a [`Registry`] keyed by a closed
//! identifier enum, so every transition target is a variant the compiler
//! knows about.
//!
//! **Lifecycle calls never change state themselves.** They return a
//! [`Transition`] and the machine performs the change after the call has
//! returned. A state has no handle on the machine, so `change_state` cannot
//! be re-entered from inside an `enter` or `exit`.
//!
//! # Usage
//! ```ignore
//! let mut fsm = StateMachine::initialize(PlayerStates::new(), PlayerStateId::Idle, &mut cx)?;
//! // Each frame:
//! fsm.logic_update(&mut cx);
//! // Each fixed physics step (zero or more per frame):
//! fsm.physics_update(&mut cx);
//! ```

use std::fmt::Debug;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Identifiers, transitions, visits
// ---------------------------------------------------------------------------

/// Closed set of behaviors one actor can be in.
pub trait StateId: Copy + Eq + Debug + 'static {
    /// Every identifier, used to verify registry wiring at setup.
    const ALL: &'static [Self];

    fn name(self) -> &'static str;

    /// Animator bool raised while this state is active.
    fn anim_bool(self) -> &'static str;
}

/// What a lifecycle call asks the machine to do once it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<I> {
    Stay,
    To(I),
}

impl<I> Transition<I> {
    pub fn is_stay(&self) -> bool {
        matches!(self, Self::Stay)
    }
}

impl<I> From<Option<I>> for Transition<I> {
    fn from(next: Option<I>) -> Self {
        match next {
            Some(id) => Self::To(id),
            None => Self::Stay,
        }
    }
}

/// Whether the current visit still runs per-tick logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Active,
    /// Set before `exit` runs and kept until the next state is entered.
    Exiting,
}

/// Bookkeeping for one enter..exit span of the active state.
///
/// Owned by the machine and rebuilt on every enter, so nothing recorded here
/// can outlive the visit it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visit {
    pub entered_at: f32,
    pub status: Status,
    /// The animation driver fired the designated keyframe callback.
    pub keyframe_reached: bool,
    /// The animation driver reported clip completion.
    pub animation_finished: bool,
}

impl Visit {
    fn begin(now: f32) -> Self {
        Self {
            entered_at: now,
            status: Status::Active,
            keyframe_reached: false,
            animation_finished: false,
        }
    }

    /// Seconds since this visit began.
    pub fn elapsed(&self, now: f32) -> f32 {
        now - self.entered_at
    }

    pub fn is_exiting(&self) -> bool {
        self.status == Status::Exiting
    }
}

// ---------------------------------------------------------------------------
// State contract
// ---------------------------------------------------------------------------

/// What the machine needs from the per-tick context it forwards to states.
pub trait MachineContext {
    /// Simulation time in seconds.
    fn now(&self) -> f32;

    fn set_anim_bool(&mut self, name: &'static str, value: bool);
}

/// A reusable unit of behavior over the context `C`.
///
/// Fields a state keeps are transition-scoped: they must be reset in
/// `enter`, never at construction.
pub trait State<C> {
    type Id: StateId;

    fn id(&self) -> Self::Id;

    fn enter(&mut self, _cx: &mut C, _visit: &Visit) {}

    /// Deferred cleanup. `visit.status` is already `Exiting`.
    fn exit(&mut self, _cx: &mut C, _visit: &Visit) {}

    /// Time- and input-based conditions. Runs once per frame.
    fn logic_update(&mut self, cx: &mut C, visit: &Visit) -> Transition<Self::Id>;

    /// Geometry-based conditions. Runs zero or more times per frame, after
    /// each fixed physics step.
    fn physics_update(&mut self, _cx: &mut C, _visit: &Visit) -> Transition<Self::Id> {
        Transition::Stay
    }

    /// Designated keyframe of the state's clip.
    fn animation_trigger(&mut self, _cx: &mut C) {}

    /// Clip completion.
    fn animation_finish_trigger(&mut self, _cx: &mut C) {}
}

/// Mapping from identifier to the one constructed instance of that state.
pub trait Registry {
    type Id: StateId;
}

/// Resolves identifiers to states for a concrete context type.
pub trait Dispatch<C>: Registry {
    fn state_mut(&mut self, id: Self::Id) -> &mut dyn State<C, Id = Self::Id>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FsmError {
    #[error("registry slot `{slot}` resolves to state `{found}`")]
    MisroutedState {
        slot: &'static str,
        found: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

/// Exactly one active state per actor, never none after construction.
pub struct StateMachine<R: Registry> {
    registry: R,
    current: R::Id,
    previous: R::Id,
    visit: Visit,
    /// Pairs enter with exit; a second enter or exit in a row is a bug.
    entered: bool,
}

impl<R: Registry> StateMachine<R> {
    /// Verify the registry, then enter `start` exactly once.
    ///
    /// This is the only constructor, so a machine that was never initialized
    /// cannot receive updates.
    pub fn initialize<C>(mut registry: R, start: R::Id, cx: &mut C) -> Result<Self, FsmError>
    where
        R: Dispatch<C>,
        C: MachineContext,
    {
        for &slot in R::Id::ALL {
            let found = registry.state_mut(slot).id();
            if found != slot {
                return Err(FsmError::MisroutedState {
                    slot: slot.name(),
                    found: found.name(),
                });
            }
        }

        let mut machine = Self {
            registry,
            current: start,
            previous: start,
            visit: Visit::begin(cx.now()),
            entered: false,
        };
        machine.enter_current(cx);
        tracing::debug!(state = start.name(), "machine initialized");
        Ok(machine)
    }

    pub fn current(&self) -> R::Id {
        self.current
    }

    pub fn previous(&self) -> R::Id {
        self.previous
    }

    pub fn visit(&self) -> &Visit {
        &self.visit
    }

    /// Simulation time at which the current state was entered.
    pub fn entered_at(&self) -> f32 {
        self.visit.entered_at
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Exit the active state and enter `next`, synchronously.
    ///
    /// Requesting the already-active state is a no-op: no exit/enter pair.
    pub fn change_state<C>(&mut self, next: R::Id, cx: &mut C)
    where
        R: Dispatch<C>,
        C: MachineContext,
    {
        if next == self.current {
            tracing::trace!(state = next.name(), "change to active state ignored");
            return;
        }

        tracing::debug!(
            from = self.current.name(),
            to = next.name(),
            t = cx.now(),
            "state change"
        );
        self.exit_current(cx);
        self.previous = std::mem::replace(&mut self.current, next);
        self.visit = Visit::begin(cx.now());
        self.enter_current(cx);
    }

    /// Forward the frame update to whichever state is active right now.
    pub fn logic_update<C>(&mut self, cx: &mut C)
    where
        R: Dispatch<C>,
        C: MachineContext,
    {
        let visit = self.visit;
        let transition = self.registry.state_mut(self.current).logic_update(cx, &visit);
        self.apply(transition, cx);
    }

    /// Forward one fixed-step update to whichever state is active right now.
    pub fn physics_update<C>(&mut self, cx: &mut C)
    where
        R: Dispatch<C>,
        C: MachineContext,
    {
        let visit = self.visit;
        let transition = self.registry.state_mut(self.current).physics_update(cx, &visit);
        self.apply(transition, cx);
    }

    pub fn animation_trigger<C>(&mut self, cx: &mut C)
    where
        R: Dispatch<C>,
        C: MachineContext,
    {
        if self.visit.is_exiting() {
            return;
        }
        self.visit.keyframe_reached = true;
        self.registry.state_mut(self.current).animation_trigger(cx);
    }

    pub fn animation_finish_trigger<C>(&mut self, cx: &mut C)
    where
        R: Dispatch<C>,
        C: MachineContext,
    {
        if self.visit.is_exiting() {
            return;
        }
        self.visit.animation_finished = true;
        self.registry.state_mut(self.current).animation_finish_trigger(cx);
    }

    fn apply<C>(&mut self, transition: Transition<R::Id>, cx: &mut C)
    where
        R: Dispatch<C>,
        C: MachineContext,
    {
        if let Transition::To(next) = transition {
            self.change_state(next, cx);
        }
    }

    fn enter_current<C>(&mut self, cx: &mut C)
    where
        R: Dispatch<C>,
        C: MachineContext,
    {
        debug_assert!(!self.entered, "`{}` entered twice", self.current.name());
        if self.entered {
            tracing::error!(state = self.current.name(), "double enter ignored");
            return;
        }
        self.entered = true;
        self.visit.status = Status::Active;
        cx.set_anim_bool(self.current.anim_bool(), true);
        let visit = self.visit;
        self.registry.state_mut(self.current).enter(cx, &visit);
    }

    fn exit_current<C>(&mut self, cx: &mut C)
    where
        R: Dispatch<C>,
        C: MachineContext,
    {
        debug_assert!(self.entered, "`{}` exited twice", self.current.name());
        if !self.entered {
            tracing::error!(state = self.current.name(), "double exit ignored");
            return;
        }
        self.visit.status = Status::Exiting;
        cx.set_anim_bool(self.current.anim_bool(), false);
        let visit = self.visit;
        self.registry.state_mut(self.current).exit(cx, &visit);
        self.entered = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Red,
        Green,
    }

    impl StateId for Light {
        const ALL: &'static [Self] = &[Light::Red, Light::Green];

        fn name(self) -> &'static str {
            match self {
                Light::Red => "Red",
                Light::Green => "Green",
            }
        }

        fn anim_bool(self) -> &'static str {
            match self {
                Light::Red => "red",
                Light::Green => "green",
            }
        }
    }

    #[derive(Default)]
    struct Log {
        now: f32,
        events: Vec<String>,
        anim: Vec<(&'static str, bool)>,
        request: Option<Light>,
        physics_request: Option<Light>,
        seen_status: Vec<Status>,
        seen_finished: Vec<bool>,
    }

    impl MachineContext for Log {
        fn now(&self) -> f32 {
            self.now
        }

        fn set_anim_bool(&mut self, name: &'static str, value: bool) {
            self.anim.push((name, value));
        }
    }

    struct Lamp(Light);

    impl State<Log> for Lamp {
        type Id = Light;

        fn id(&self) -> Light {
            self.0
        }

        fn enter(&mut self, cx: &mut Log, visit: &Visit) {
            cx.events.push(format!("enter {}", self.0.name()));
            cx.seen_finished.push(visit.animation_finished);
        }

        fn exit(&mut self, cx: &mut Log, visit: &Visit) {
            cx.events.push(format!("exit {}", self.0.name()));
            cx.seen_status.push(visit.status);
        }

        fn logic_update(&mut self, cx: &mut Log, _visit: &Visit) -> Transition<Light> {
            cx.events.push(format!("logic {}", self.0.name()));
            cx.request.take().into()
        }

        fn physics_update(&mut self, cx: &mut Log, _visit: &Visit) -> Transition<Light> {
            cx.events.push(format!("physics {}", self.0.name()));
            cx.physics_request.take().into()
        }
    }

    struct Lamps {
        red: Lamp,
        green: Lamp,
    }

    impl Lamps {
        fn new() -> Self {
            Self {
                red: Lamp(Light::Red),
                green: Lamp(Light::Green),
            }
        }
    }

    impl Registry for Lamps {
        type Id = Light;
    }

    impl Dispatch<Log> for Lamps {
        fn state_mut(&mut self, id: Light) -> &mut dyn State<Log, Id = Light> {
            match id {
                Light::Red => &mut self.red,
                Light::Green => &mut self.green,
            }
        }
    }

    #[test]
    fn initialize_enters_start_once() {
        let mut log = Log::default();
        let fsm = StateMachine::initialize(Lamps::new(), Light::Red, &mut log).unwrap();

        assert_eq!(fsm.current(), Light::Red);
        assert_eq!(log.events, vec!["enter Red"]);
        assert_eq!(log.anim, vec![("red", true)]);
    }

    #[test]
    fn change_to_active_state_is_noop() {
        let mut log = Log::default();
        let mut fsm = StateMachine::initialize(Lamps::new(), Light::Red, &mut log).unwrap();

        fsm.change_state(Light::Red, &mut log);

        assert_eq!(log.events, vec!["enter Red"]);
    }

    #[test]
    fn exit_completes_before_next_enter() {
        let mut log = Log::default();
        let mut fsm = StateMachine::initialize(Lamps::new(), Light::Red, &mut log).unwrap();

        log.now = 2.5;
        fsm.change_state(Light::Green, &mut log);
        fsm.change_state(Light::Red, &mut log);

        assert_eq!(
            log.events,
            vec!["enter Red", "exit Red", "enter Green", "exit Green", "enter Red"]
        );
        assert_eq!(
            log.anim,
            vec![
                ("red", true),
                ("red", false),
                ("green", true),
                ("green", false),
                ("red", true)
            ]
        );
        assert_eq!(log.seen_status, vec![Status::Exiting, Status::Exiting]);
        assert_eq!(fsm.entered_at(), 2.5);
        assert_eq!(fsm.previous(), Light::Green);
    }

    #[test]
    fn requested_transitions_apply_after_call_returns() {
        let mut log = Log::default();
        let mut fsm = StateMachine::initialize(Lamps::new(), Light::Red, &mut log).unwrap();

        log.request = Some(Light::Green);
        fsm.logic_update(&mut log);
        // The next physics step already runs on the new state.
        log.physics_request = Some(Light::Red);
        fsm.physics_update(&mut log);

        assert_eq!(
            log.events,
            vec![
                "enter Red",
                "logic Red",
                "exit Red",
                "enter Green",
                "physics Green",
                "exit Green",
                "enter Red"
            ]
        );
    }

    #[test]
    fn animation_flags_do_not_leak_into_next_visit() {
        let mut log = Log::default();
        let mut fsm = StateMachine::initialize(Lamps::new(), Light::Red, &mut log).unwrap();

        fsm.animation_trigger(&mut log);
        fsm.animation_finish_trigger(&mut log);
        assert!(fsm.visit().animation_finished);
        assert!(fsm.visit().keyframe_reached);

        fsm.change_state(Light::Green, &mut log);
        fsm.change_state(Light::Red, &mut log);

        assert!(!fsm.visit().animation_finished);
        assert!(!fsm.visit().keyframe_reached);
        assert_eq!(log.seen_finished, vec![false, false, false]);
    }

    #[test]
    fn misrouted_registry_fails_at_setup() {
        let mut log = Log::default();
        let lamps = Lamps {
            red: Lamp(Light::Red),
            green: Lamp(Light::Red),
        };

        let err = StateMachine::initialize(lamps, Light::Red, &mut log).err();

        assert_eq!(
            err,
            Some(FsmError::MisroutedState {
                slot: "Green",
                found: "Red"
            })
        );
        assert!(log.events.is_empty());
    }
}
