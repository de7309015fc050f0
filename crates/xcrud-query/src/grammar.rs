//! Call-sequence grammars.
//!
//! Every builder kind has one static [`Grammar`]: for each call, the list of
//! steps after which that call may be invoked. A builder carries a
//! [`CallState`] pointing at its grammar and at the last call that fully
//! succeeded. Calls are checked against the state before any argument is
//! validated, and the state only moves once a call has succeeded.

use std::fmt;
use xcrud_core::SequenceError;

/// A named call of one builder kind.
pub trait Call: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Call name as exposed to callers, e.g. `orderBy`.
    fn name(self) -> &'static str;

    /// Whether this call runs the statement.
    fn is_terminal(self) -> bool {
        self.name() == "execute"
    }
}

/// Defines a call enum and its [`Call`] impl from `Variant => "name"` pairs.
macro_rules! call_enum {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::grammar::Call for $name {
            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }
    };
}
pub(crate) use call_enum;

/// Position in a builder's call sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<C> {
    /// Builder constructed, no call made yet
    Start,
    /// Last successful call
    After(C),
}

/// One grammar entry: `call` is enabled right after any of `enabled_after`.
#[derive(Debug)]
pub struct Rule<C: 'static> {
    pub call: C,
    pub enabled_after: &'static [Step<C>],
}

/// Register `call` as enabled after each step of `enabled_after`.
pub const fn register<C>(call: C, enabled_after: &'static [Step<C>]) -> Rule<C> {
    Rule {
        call,
        enabled_after,
    }
}

/// Immutable call table of one builder kind.
#[derive(Debug)]
pub struct Grammar<C: 'static> {
    class: &'static str,
    rules: &'static [Rule<C>],
}

impl<C: Call> Grammar<C> {
    pub const fn new(class: &'static str, rules: &'static [Rule<C>]) -> Self {
        Self { class, rules }
    }

    /// Class name reported in diagnostics, e.g. `TableUpdate`.
    pub fn class(&self) -> &'static str {
        self.class
    }

    /// `Class.call`
    pub fn qualified(&self, call: C) -> String {
        format!("{}.{}", self.class, call.name())
    }

    pub fn allows(&self, step: Step<C>, call: C) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.call == call && rule.enabled_after.contains(&step))
    }

    /// Calls enabled at `step`, in table order.
    pub fn enabled_at(&self, step: Step<C>) -> Vec<C> {
        self.rules
            .iter()
            .filter(|rule| rule.enabled_after.contains(&step))
            .map(|rule| rule.call)
            .collect()
    }

    /// Look a call up by its exposed name.
    ///
    /// When several calls share a name the first registered one wins.
    pub fn resolve(&self, name: &str) -> Option<C> {
        self.rules
            .iter()
            .map(|rule| rule.call)
            .find(|call| call.name() == name)
    }
}

/// Where one builder instance stands in its grammar.
#[derive(Debug, Clone, Copy)]
pub struct CallState<C: 'static> {
    grammar: &'static Grammar<C>,
    step: Step<C>,
}

impl<C: Call> CallState<C> {
    pub fn new(grammar: &'static Grammar<C>) -> Self {
        Self {
            grammar,
            step: Step::Start,
        }
    }

    pub fn grammar(&self) -> &'static Grammar<C> {
        self.grammar
    }

    pub fn step(&self) -> Step<C> {
        self.step
    }

    pub fn is_enabled(&self, call: C) -> bool {
        self.grammar.allows(self.step, call)
    }

    pub fn enabled(&self) -> Vec<C> {
        self.grammar.enabled_at(self.step)
    }

    /// Enabled call names, without duplicates.
    pub fn enabled_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for call in self.enabled() {
            if !names.contains(&call.name()) {
                names.push(call.name());
            }
        }
        names
    }

    /// Fail with a [`SequenceError`] if `call` is not enabled right now.
    pub fn ensure_enabled(&self, call: C) -> Result<(), SequenceError> {
        if self.is_enabled(call) {
            Ok(())
        } else {
            tracing::debug!(
                call = %self.grammar.qualified(call),
                step = ?self.step,
                "call rejected by grammar"
            );
            Err(SequenceError::new(
                self.grammar.qualified(call),
                self.enabled_names(),
            ))
        }
    }

    /// Record `call` as the last successful call.
    pub fn advance(&mut self, call: C) {
        tracing::trace!(
            class = self.grammar.class,
            from = ?self.step,
            to = call.name(),
            "call state advanced"
        );
        self.step = Step::After(call);
    }
}
