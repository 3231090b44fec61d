// Core data structures for the duty roster

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::engine::error::{EngineError, EngineResult};

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of a person, a group, or a family serving a family duty
///
/// Slots hold plain identifiers and resolve them against the current
/// [`Roster`] on every call, so a roster replaced wholesale never leaves
/// stale references behind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier of a family
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyId(String);

impl FamilyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FamilyId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// ============================================================================
// Roles
// ============================================================================

/// Duty types a person or a group can be scheduled into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleId {
    /// Chairman of a meeting
    Presiding,
    OpeningPrayer,
    ClosingPrayer,
    BibleReading,
    SpiritualGems,
    /// Student assignment in the ministry section
    StudentPart,
    /// Householder partnering a student
    MinistryAssistant,
    /// Talk or discussion in the Christian-life section
    ChristianLifeTalk,
    StudyConductor,
    StudyReader,
    /// Local public-talk speaker
    PublicTalkSpeaker,
    WatchtowerReader,
    /// Speaker sent out to another congregation
    ExternalSpeaker,
    /// Family hosting the visiting speaker
    Hospitality,
    SoundSystem,
    Attendant,
    Microphone,
    /// Group duty: cleaning of the hall
    FacilityCleaning,
    /// Group duty: grounds and green-space upkeep
    GroundsUpkeep,
}

impl RoleId {
    /// Get all roles
    pub fn all() -> Vec<Self> {
        vec![
            Self::Presiding,
            Self::OpeningPrayer,
            Self::ClosingPrayer,
            Self::BibleReading,
            Self::SpiritualGems,
            Self::StudentPart,
            Self::MinistryAssistant,
            Self::ChristianLifeTalk,
            Self::StudyConductor,
            Self::StudyReader,
            Self::PublicTalkSpeaker,
            Self::WatchtowerReader,
            Self::ExternalSpeaker,
            Self::Hospitality,
            Self::SoundSystem,
            Self::Attendant,
            Self::Microphone,
            Self::FacilityCleaning,
            Self::GroundsUpkeep,
        ]
    }

    /// Get role ID as string
    pub fn id(&self) -> &'static str {
        match self {
            Self::Presiding => "presiding",
            Self::OpeningPrayer => "opening_prayer",
            Self::ClosingPrayer => "closing_prayer",
            Self::BibleReading => "bible_reading",
            Self::SpiritualGems => "spiritual_gems",
            Self::StudentPart => "student_part",
            Self::MinistryAssistant => "ministry_assistant",
            Self::ChristianLifeTalk => "christian_life_talk",
            Self::StudyConductor => "study_conductor",
            Self::StudyReader => "study_reader",
            Self::PublicTalkSpeaker => "public_talk_speaker",
            Self::WatchtowerReader => "watchtower_reader",
            Self::ExternalSpeaker => "external_speaker",
            Self::Hospitality => "hospitality",
            Self::SoundSystem => "sound_system",
            Self::Attendant => "attendant",
            Self::Microphone => "microphone",
            Self::FacilityCleaning => "facility_cleaning",
            Self::GroundsUpkeep => "grounds_upkeep",
        }
    }

    /// Get French label, as shown on printed programmes
    pub fn french_label(&self) -> &'static str {
        match self {
            Self::Presiding => "Président",
            Self::OpeningPrayer => "Prière d'ouverture",
            Self::ClosingPrayer => "Prière de fin",
            Self::BibleReading => "Lecture de la Bible",
            Self::SpiritualGems => "Perles spirituelles",
            Self::StudentPart => "Exposé d'élève",
            Self::MinistryAssistant => "Interlocuteur",
            Self::ChristianLifeTalk => "Discours Vie chrétienne",
            Self::StudyConductor => "Conducteur de l'étude",
            Self::StudyReader => "Lecteur de l'étude",
            Self::PublicTalkSpeaker => "Orateur",
            Self::WatchtowerReader => "Lecteur de la Tour de Garde",
            Self::ExternalSpeaker => "Orateur à l'extérieur",
            Self::Hospitality => "Hospitalité",
            Self::SoundSystem => "Sonorisation",
            Self::Attendant => "Accueil",
            Self::Microphone => "Micros",
            Self::FacilityCleaning => "Nettoyage",
            Self::GroundsUpkeep => "Entretien des espaces verts",
        }
    }

    /// Parse from string
    pub fn from_id(id: &str) -> EngineResult<Self> {
        let normalized = id.trim().to_lowercase().replace(['-', ' '], "_");
        Self::all()
            .into_iter()
            .find(|role| role.id() == normalized)
            .ok_or_else(|| EngineError::UnknownRole { id: id.to_string() })
    }

    /// Whether this duty is served by groups rather than individuals
    pub fn is_group_duty(&self) -> bool {
        matches!(self, Self::FacilityCleaning | Self::GroundsUpkeep)
    }

    /// Whether this duty is served by whole families
    pub fn is_family_duty(&self) -> bool {
        matches!(self, Self::Hospitality)
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for RoleId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s)
    }
}

/// Sub-event of a period served by group duties (midweek / weekend)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubEvent {
    A,
    B,
}

// ============================================================================
// Roster
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

fn default_active() -> bool {
    true
}

/// A person on the roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: EntityId,
    pub display_name: String,
    /// Duty types this person may perform
    #[serde(default)]
    pub capabilities: BTreeSet<RoleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_id: Option<FamilyId>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Person {
    pub fn new(id: impl Into<EntityId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            capabilities: BTreeSet::new(),
            family_id: None,
            gender: Gender::Unknown,
            active: true,
        }
    }

    pub fn with_capability(mut self, role: RoleId) -> Self {
        self.capabilities.insert(role);
        self
    }

    pub fn with_capabilities(mut self, roles: impl IntoIterator<Item = RoleId>) -> Self {
        self.capabilities.extend(roles);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_family(mut self, family: impl Into<FamilyId>) -> Self {
        self.family_id = Some(family.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// A group serving recurring group duties (cleaning, upkeep)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: EntityId,
    pub name: String,
    /// Group duties this group takes part in
    #[serde(default)]
    pub duties: BTreeSet<RoleId>,
    #[serde(default)]
    pub members: Vec<EntityId>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Group {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duties: BTreeSet::new(),
            members: Vec::new(),
            active: true,
        }
    }

    pub fn with_duty(mut self, role: RoleId) -> Self {
        self.duties.insert(role);
        self
    }

    pub fn with_member(mut self, person: impl Into<EntityId>) -> Self {
        self.members.push(person.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// A household; people point to it through `family_id`, and family duties
/// assign it directly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    pub id: FamilyId,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Family {
    pub fn new(id: impl Into<FamilyId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            active: true,
        }
    }

    /// The id a slot holds when this family is assigned
    pub fn entity_id(&self) -> EntityId {
        EntityId::new(self.id.as_str())
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Read-only snapshot of people, groups and families
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub families: Vec<Family>,
}

impl Roster {
    pub fn new(people: Vec<Person>, groups: Vec<Group>) -> Self {
        Self {
            people,
            groups,
            families: Vec::new(),
        }
    }

    pub fn with_family(mut self, family: Family) -> Self {
        self.families.push(family);
        self
    }

    pub fn person(&self, id: &EntityId) -> Option<&Person> {
        self.people.iter().find(|p| &p.id == id)
    }

    pub fn group(&self, id: &EntityId) -> Option<&Group> {
        self.groups.iter().find(|g| &g.id == id)
    }

    pub fn family(&self, id: &FamilyId) -> Option<&Family> {
        self.families.iter().find(|f| &f.id == id)
    }

    /// Family assigned under `id` to a family duty
    pub fn family_entity(&self, id: &EntityId) -> Option<&Family> {
        self.families.iter().find(|f| f.id.as_str() == id.as_str())
    }

    /// Family of a person, if the id resolves to a person with one
    pub fn family_of(&self, id: &EntityId) -> Option<&FamilyId> {
        self.person(id).and_then(|p| p.family_id.as_ref())
    }

    /// Display name of a person, group or family
    pub fn display_name(&self, id: &EntityId) -> Option<&str> {
        self.person(id)
            .map(|p| p.display_name.as_str())
            .or_else(|| self.group(id).map(|g| g.name.as_str()))
            .or_else(|| self.family_entity(id).map(|f| f.name.as_str()))
    }
}

// ============================================================================
// Schedule
// ============================================================================

/// One assignment target inside a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Unique within its period (e.g. "reader", "cleaning.a.0")
    pub id: String,
    pub role: RoleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_event: Option<SubEvent>,
    #[serde(default)]
    pub assignee: Option<EntityId>,
}

impl Slot {
    pub fn new(id: impl Into<String>, role: RoleId) -> Self {
        Self {
            id: id.into(),
            role,
            sub_event: None,
            assignee: None,
        }
    }

    pub fn for_sub_event(mut self, sub_event: SubEvent) -> Self {
        self.sub_event = Some(sub_event);
        self
    }

    pub fn with_assignee(mut self, entity: impl Into<EntityId>) -> Self {
        self.assignee = Some(entity.into());
        self
    }

    pub fn is_filled(&self) -> bool {
        self.assignee.is_some()
    }
}

/// Slot layout used when periods are generated in bulk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTemplate {
    pub id: String,
    pub role: RoleId,
    #[serde(default)]
    pub sub_event: Option<SubEvent>,
}

impl SlotTemplate {
    pub fn new(id: impl Into<String>, role: RoleId) -> Self {
        Self {
            id: id.into(),
            role,
            sub_event: None,
        }
    }

    pub fn for_sub_event(mut self, sub_event: SubEvent) -> Self {
        self.sub_event = Some(sub_event);
        self
    }

    fn instantiate(&self) -> Slot {
        Slot {
            id: self.id.clone(),
            role: self.role,
            sub_event: self.sub_event,
            assignee: None,
        }
    }
}

/// One scheduling cycle (a week) identified by its start date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub slots: Vec<Slot>,
}

impl Period {
    pub fn new(start: NaiveDate, slots: Vec<Slot>) -> Self {
        Self {
            start,
            label: None,
            slots,
        }
    }

    pub fn slot(&self, id: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id == id)
    }

    pub fn slot_mut(&mut self, id: &str) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.id == id)
    }

    pub fn slots_for_role(&self, role: RoleId) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(move |s| s.role == role)
    }

    pub fn filled_slots(&self) -> impl Iterator<Item = (&Slot, &EntityId)> {
        self.slots
            .iter()
            .filter_map(|s| s.assignee.as_ref().map(|e| (s, e)))
    }
}

/// A planned slot mutation, returned for the host to apply and persist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotUpdate {
    pub period: NaiveDate,
    pub slot_id: String,
    pub assignee: Option<EntityId>,
}

impl SlotUpdate {
    pub fn assign(period: NaiveDate, slot_id: impl Into<String>, entity: EntityId) -> Self {
        Self {
            period,
            slot_id: slot_id.into(),
            assignee: Some(entity),
        }
    }

    pub fn clear(period: NaiveDate, slot_id: impl Into<String>) -> Self {
        Self {
            period,
            slot_id: slot_id.into(),
            assignee: None,
        }
    }
}

#[derive(Deserialize)]
struct ScheduleRepr {
    #[serde(default)]
    periods: Vec<Period>,
}

impl TryFrom<ScheduleRepr> for Schedule {
    type Error = EngineError;

    fn try_from(repr: ScheduleRepr) -> Result<Self, Self::Error> {
        Schedule::new(repr.periods)
    }
}

/// Ordered sequence of periods with strictly increasing start dates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleRepr")]
pub struct Schedule {
    periods: Vec<Period>,
}

impl Schedule {
    /// Build a schedule, rejecting duplicate or out-of-order period dates
    pub fn new(periods: Vec<Period>) -> EngineResult<Self> {
        for pair in periods.windows(2) {
            let (previous, next) = (pair[0].start, pair[1].start);
            if previous == next {
                return Err(EngineError::DuplicatePeriod { date: next });
            }
            if previous > next {
                return Err(EngineError::UnorderedPeriods { previous, next });
            }
        }
        Ok(Self { periods })
    }

    /// Create `count` periods from `start`, `spacing_days` apart, each laid
    /// out from `template`
    pub fn generate(
        start: NaiveDate,
        count: usize,
        spacing_days: u32,
        template: &[SlotTemplate],
    ) -> EngineResult<Self> {
        if spacing_days == 0 {
            return Err(EngineError::invalid_config(
                "spacing_days",
                "must be at least 1",
            ));
        }

        let periods = (0..count)
            .map(|i| {
                let offset = Duration::days(i as i64 * spacing_days as i64);
                Period::new(
                    start + offset,
                    template.iter().map(SlotTemplate::instantiate).collect(),
                )
            })
            .collect();

        Self::new(periods)
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.periods.binary_search_by_key(&date, |p| p.start).ok()
    }

    pub fn period(&self, date: NaiveDate) -> Option<&Period> {
        self.index_of(date).map(|i| &self.periods[i])
    }

    /// Number of periods starting strictly before `date`
    pub fn count_before(&self, date: NaiveDate) -> usize {
        self.periods.partition_point(|p| p.start < date)
    }

    /// Periods strictly before `date`
    pub fn periods_before(&self, date: NaiveDate) -> &[Period] {
        &self.periods[..self.count_before(date)]
    }

    /// Periods starting on or after `date`
    pub fn periods_from(&self, date: NaiveDate) -> &[Period] {
        &self.periods[self.count_before(date)..]
    }

    /// Assign an entity to a slot, returning the previous assignee
    pub fn assign(
        &mut self,
        date: NaiveDate,
        slot_id: &str,
        entity: Option<EntityId>,
    ) -> EngineResult<Option<EntityId>> {
        let slot = self.slot_mut(date, slot_id)?;
        Ok(std::mem::replace(&mut slot.assignee, entity))
    }

    /// Clear a slot; the period itself is kept
    pub fn clear(&mut self, date: NaiveDate, slot_id: &str) -> EngineResult<Option<EntityId>> {
        self.assign(date, slot_id, None)
    }

    /// Apply a batch of updates; nothing is written unless every target exists
    pub fn apply(&mut self, updates: &[SlotUpdate]) -> EngineResult<()> {
        for update in updates {
            let period = self
                .period(update.period)
                .ok_or(EngineError::PeriodNotFound { date: update.period })?;
            if period.slot(&update.slot_id).is_none() {
                return Err(EngineError::SlotNotFound {
                    date: update.period,
                    slot: update.slot_id.clone(),
                });
            }
        }

        for update in updates {
            self.assign(update.period, &update.slot_id, update.assignee.clone())?;
        }
        Ok(())
    }

    fn slot_mut(&mut self, date: NaiveDate, slot_id: &str) -> EngineResult<&mut Slot> {
        let index = self
            .index_of(date)
            .ok_or(EngineError::PeriodNotFound { date })?;
        self.periods[index]
            .slot_mut(slot_id)
            .ok_or_else(|| EngineError::SlotNotFound {
                date,
                slot: slot_id.to_string(),
            })
    }
}

// ============================================================================
// Tests
// ============================================================================
