//! Static trigger data

use serde::{Deserialize, Serialize};

use rift_math::Aabb;

/// Identifier of an authored cutscene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CutsceneId(pub u32);

impl CutsceneId {
    /// Sentinel for "no cutscene". Rules carry it when they only send a
    /// signal; the director ignores it.
    pub const NONE: Self = Self(u32::MAX);

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

/// Kind of body a trigger rule reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubjectKind {
    /// Nothing triggers care about
    None,
    /// The player
    Player,
    /// A carryable cube, either tracked or untracked decor
    Cube,
}

/// One rule of a trigger: fires when a matching body is inside the volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerRule {
    /// Body kind this rule reacts to
    pub subject: SubjectKind,
    /// Signal to send when the rule fires; `None` skips the send
    pub signal: Option<u32>,
    /// Cutscene to hand to the director when the rule fires
    pub cutscene: CutsceneId,
}

/// Authored trigger: a box volume and its ordered rules.
///
/// Rule order is authoring order and dispatch order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trigger {
    /// Volume in world space
    pub volume: Aabb,
    /// Rules in dispatch order
    pub rules: Vec<TriggerRule>,
}

impl Trigger {
    pub fn new(volume: Aabb) -> Self {
        Self {
            volume,
            rules: Vec::new(),
        }
    }

    /// Append a rule
    pub fn with_rule(mut self, subject: SubjectKind, signal: Option<u32>, cutscene: CutsceneId) -> Self {
        self.rules.push(TriggerRule {
            subject,
            signal,
            cutscene,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rift_math::Vec3;

    #[test]
    fn test_rules_keep_authoring_order() {
        let trigger = Trigger::new(Aabb::new(Vec3::ZERO, Vec3::ONE))
            .with_rule(SubjectKind::Player, Some(3), CutsceneId::NONE)
            .with_rule(SubjectKind::Cube, None, CutsceneId(7));

        assert_eq!(trigger.rules.len(), 2);
        assert_eq!(trigger.rules[0].subject, SubjectKind::Player);
        assert_eq!(trigger.rules[0].signal, Some(3));
        assert!(trigger.rules[0].cutscene.is_none());
        assert_eq!(trigger.rules[1].cutscene, CutsceneId(7));
    }
}
