//! Eligibility index
//!
//! Pure predicates mapping a role to a filter over the roster. Nothing here
//! looks at history, and nothing here fails: an entity that cannot be judged
//! (unknown id, blank id, unknown gender on a restricted role) is ineligible.
//!
//! People serve person duties, groups serve group duties, and families serve
//! family duties (hospitality); no entity crosses over.

use crate::models::{EntityId, Family, Gender, Group, Person, RoleId, Roster};

/// Gender restriction attached to a role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderRule {
    Any,
    MaleOnly,
}

impl GenderRule {
    pub fn for_role(role: RoleId) -> Self {
        match role {
            RoleId::StudentPart | RoleId::MinistryAssistant | RoleId::Hospitality => Self::Any,
            RoleId::FacilityCleaning | RoleId::GroundsUpkeep => Self::Any,
            _ => Self::MaleOnly,
        }
    }

    fn admits(&self, gender: Gender) -> bool {
        match self {
            Self::Any => true,
            Self::MaleOnly => gender == Gender::Male,
        }
    }
}

/// Whether `person` may serve `role` right now
pub fn eligible_for(role: RoleId, person: &Person) -> bool {
    if role.is_group_duty() || role.is_family_duty() || !person.active || person.id.is_empty() {
        return false;
    }
    person.capabilities.contains(&role) && GenderRule::for_role(role).admits(person.gender)
}

/// Whether `group` may serve the group duty `role` right now
pub fn group_eligible_for(role: RoleId, group: &Group) -> bool {
    role.is_group_duty() && group.active && !group.id.is_empty() && group.duties.contains(&role)
}

/// Whether `family` may serve the family duty `role` right now
pub fn family_eligible_for(role: RoleId, family: &Family) -> bool {
    role.is_family_duty() && family.active && !family.id.as_str().trim().is_empty()
}

/// Resolve `entity` against the roster and test it; unknown ids are ineligible
pub fn is_entity_eligible(role: RoleId, entity: &EntityId, roster: &Roster) -> bool {
    if role.is_group_duty() {
        roster
            .group(entity)
            .is_some_and(|g| group_eligible_for(role, g))
    } else if role.is_family_duty() {
        roster
            .family_entity(entity)
            .is_some_and(|f| family_eligible_for(role, f))
    } else {
        roster.person(entity).is_some_and(|p| eligible_for(role, p))
    }
}

/// Eligible entity ids for `role`, in roster order
pub fn eligible_entities(role: RoleId, roster: &Roster) -> Vec<EntityId> {
    if role.is_group_duty() {
        roster
            .groups
            .iter()
            .filter(|g| group_eligible_for(role, g))
            .map(|g| g.id.clone())
            .collect()
    } else if role.is_family_duty() {
        roster
            .families
            .iter()
            .filter(|f| family_eligible_for(role, f))
            .map(Family::entity_id)
            .collect()
    } else {
        roster
            .people
            .iter()
            .filter(|p| eligible_for(role, p))
            .map(|p| p.id.clone())
            .collect()
    }
}

/// Eligible groups for a group duty, in roster order
pub fn eligible_groups(role: RoleId, roster: &Roster) -> Vec<&Group> {
    roster
        .groups
        .iter()
        .filter(|g| group_eligible_for(role, g))
        .collect()
}
