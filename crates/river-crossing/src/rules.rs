//! Safety rules deciding whether a group may be left alone on a bank.
//!
//! The same predicate applies to either bank. Empty banks and lone people
//! are always safe.

use crate::puzzle::{Role, SafetyRule};
use crate::state::{Bank, State};

/// Which roles are present on a bank, gathered in one pass
#[derive(Debug, Clone, Copy, Default)]
struct Presence {
    police: bool,
    father: bool,
    mother: bool,
    thief: bool,
    son: bool,
    daughter: bool,
    count: usize,
}

impl Presence {
    fn of(bank: &Bank) -> Self {
        let mut presence = Presence::default();
        for person in bank.iter() {
            presence.count += 1;
            match person.role {
                Role::Police => presence.police = true,
                Role::Father => presence.father = true,
                Role::Mother => presence.mother = true,
                Role::Thief => presence.thief = true,
                Role::Son => presence.son = true,
                Role::Daughter => presence.daughter = true,
            }
        }
        presence
    }
}

fn violates_presence(p: &Presence, rule: SafetyRule) -> bool {
    match rule {
        SafetyRule::ThiefNeedsPolice => p.thief && !p.police && p.count > 1,
        SafetyRule::FatherNeedsMother => p.father && p.daughter && !p.mother,
        SafetyRule::MotherNeedsFather => p.mother && p.son && !p.father,
    }
}

/// Check that no active rule is broken on this bank
pub fn is_safe(bank: &Bank, rules: &[SafetyRule]) -> bool {
    let presence = Presence::of(bank);
    !rules.iter().any(|&rule| violates_presence(&presence, rule))
}

/// Both banks of a state are safe
pub fn is_state_safe(state: &State, rules: &[SafetyRule]) -> bool {
    is_safe(&state.left_bank, rules) && is_safe(&state.right_bank, rules)
}
