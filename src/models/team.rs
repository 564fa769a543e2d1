//! Team model (output side).
//!
//! A team is what the caller receives: an ordered member list with the
//! target capacity it was planned for and its aggregate skill.

use serde::{Deserialize, Serialize};

/// A placed individual, denormalized for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Individual id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Skill rating.
    pub skill: f64,
}

/// A finished team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Position in the partition (0-based).
    pub index: usize,
    /// Display label ("Team 1", "Team 2", ...).
    pub name: String,
    /// Target size from capacity planning.
    pub capacity: usize,
    /// Members, strongest first.
    pub members: Vec<Member>,
    /// Sum of member skills.
    pub skill_sum: f64,
}

impl Member {
    /// Creates a member.
    pub fn new(id: impl Into<String>, name: impl Into<String>, skill: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            skill,
        }
    }
}

impl Team {
    /// Creates an empty team with the default label.
    pub fn new(index: usize, capacity: usize) -> Self {
        Self {
            index,
            name: format!("Team {}", index + 1),
            capacity,
            members: Vec::new(),
            skill_sum: 0.0,
        }
    }

    /// Appends a member and updates the skill sum.
    pub fn add_member(&mut self, member: Member) {
        self.skill_sum += member.skill;
        self.members.push(member);
    }

    /// Orders members by descending skill, then by name.
    pub fn sort_members(&mut self) {
        self.members.sort_by(|a, b| {
            b.skill
                .total_cmp(&a.skill)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
    }

    /// Number of members.
    #[inline]
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Average member skill (0.0 for an empty team).
    pub fn average(&self) -> f64 {
        if self.members.is_empty() {
            0.0
        } else {
            self.skill_sum / self.members.len() as f64
        }
    }

    /// Whether an individual with this id is on the team.
    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    /// Member ids in team order.
    pub fn member_ids(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_aggregates() {
        let mut t = Team::new(1, 3);
        t.add_member(Member::new("a", "Avi", 6.0));
        t.add_member(Member::new("b", "Ben", 8.0));

        assert_eq!(t.name, "Team 2");
        assert_eq!(t.size(), 2);
        assert!((t.skill_sum - 14.0).abs() < 1e-10);
        assert!((t.average() - 7.0).abs() < 1e-10);
        assert!(t.contains("a"));
        assert!(!t.contains("z"));
    }

    #[test]
    fn test_sort_members_strongest_first() {
        let mut t = Team::new(0, 3);
        t.add_member(Member::new("1", "Carmel", 5.0));
        t.add_member(Member::new("2", "Adi", 9.5));
        t.add_member(Member::new("3", "Bar", 5.0));
        t.sort_members();

        assert_eq!(t.member_ids(), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_empty_team_average() {
        let t = Team::new(1, 2);
        assert_eq!(t.name, "Team 2");
        assert!((t.average() - 0.0).abs() < 1e-10);
    }
}
