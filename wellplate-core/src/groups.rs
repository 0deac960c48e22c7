//! Well-to-group assignment
//!
//! Group definitions arrive as an ordered list of `(name, range expressions)`.
//! Each expression is expanded and every well it covers is mapped to the
//! group name. A later group overwrites an earlier one for the same well
//! unless strict mode is enabled.

use crate::range::WellRange;
use crate::types::{PlateError, Result};
use crate::well::WellAddress;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One experimental group and the range expressions that select its wells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDefinition {
    pub name: String,
    #[serde(default)]
    pub ranges: Vec<String>,
}

impl GroupDefinition {
    pub fn new(name: impl Into<String>, ranges: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            ranges: ranges.into_iter().map(Into::into).collect(),
        }
    }
}

/// A well that was moved from one group to another during assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    pub well: WellAddress,
    pub previous: String,
    pub group: String,
}

/// A range token that could not be parsed and was left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedToken {
    pub group: String,
    pub expression: String,
}

/// The finished well → group lookup for one run
#[derive(Debug, Clone, Default)]
pub struct GroupAssignment {
    wells: BTreeMap<WellAddress, String>,
    reassignments: Vec<Reassignment>,
    skipped: Vec<SkippedToken>,
}

impl GroupAssignment {
    /// Group a well was assigned to, if any
    pub fn get(&self, well: &WellAddress) -> Option<&str> {
        self.wells.get(well).map(String::as_str)
    }

    /// Group a well was assigned to, or `default` when none covers it
    pub fn group_or<'a>(&'a self, well: &WellAddress, default: &'a str) -> &'a str {
        self.get(well).unwrap_or(default)
    }

    /// Wells currently held by `group`, in ascending order
    pub fn wells_in(&self, group: &str) -> Vec<WellAddress> {
        self.wells
            .iter()
            .filter(|(_, g)| g.as_str() == group)
            .map(|(well, _)| *well)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WellAddress, &str)> {
        self.wells.iter().map(|(well, group)| (well, group.as_str()))
    }

    pub fn len(&self) -> usize {
        self.wells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }

    /// Wells that changed group because a later definition covered them again
    pub fn reassignments(&self) -> &[Reassignment] {
        &self.reassignments
    }

    /// Range tokens that were dropped as malformed
    pub fn skipped_tokens(&self) -> &[SkippedToken] {
        &self.skipped
    }
}

/// Builds a [`GroupAssignment`] from group definitions
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupAssigner {
    strict: bool,
}

impl GroupAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: fail with `ConflictingAssignment` instead of overwriting
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Expand every group's ranges and build the lookup
    ///
    /// Malformed range tokens are logged, recorded and skipped; the rest of
    /// that group's tokens are still applied. An empty group name, a
    /// diagonal range or (in strict mode) a cross-group overlap aborts the
    /// whole assignment.
    pub fn assign(&self, definitions: &[GroupDefinition]) -> Result<GroupAssignment> {
        let mut assignment = GroupAssignment::default();

        for definition in definitions {
            let name = definition.name.trim();
            if name.is_empty() {
                return Err(PlateError::InvalidGroupName(definition.name.clone()));
            }

            let mut covered = 0usize;
            for expression in &definition.ranges {
                let range = match WellRange::parse(expression) {
                    Ok(range) => range,
                    Err(PlateError::MalformedRangeExpression(token)) => {
                        log::warn!("Skipped invalid range {:?} in group '{}'", token, name);
                        assignment.skipped.push(SkippedToken {
                            group: name.to_string(),
                            expression: token,
                        });
                        continue;
                    }
                    Err(e) => return Err(e),
                };

                for well in range.wells() {
                    self.insert(&mut assignment, well, name)?;
                    covered += 1;
                }
            }

            log::debug!(
                "Group '{}': {} well(s) from {} range(s)",
                name,
                covered,
                definition.ranges.len()
            );
        }

        log::info!(
            "Assigned {} well(s) to {} group(s)",
            assignment.len(),
            definitions.len()
        );
        Ok(assignment)
    }

    fn insert(&self, assignment: &mut GroupAssignment, well: WellAddress, group: &str) -> Result<()> {
        match assignment.wells.insert(well, group.to_string()) {
            Some(previous) if previous != group => {
                if self.strict {
                    return Err(PlateError::ConflictingAssignment {
                        well,
                        existing: previous,
                        incoming: group.to_string(),
                    });
                }
                log::warn!("Well {} moved from group '{}' to '{}'", well, previous, group);
                assignment.reassignments.push(Reassignment {
                    well,
                    previous,
                    group: group.to_string(),
                });
            }
            _ => {}
        }
        Ok(())
    }
}

/// Assign wells to groups with the default (last-write-wins) policy
pub fn assign(definitions: &[GroupDefinition]) -> Result<GroupAssignment> {
    GroupAssigner::new().assign(definitions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(id: &str) -> WellAddress {
        WellAddress::parse(id).unwrap()
    }

    #[test]
    fn test_last_write_wins_on_overlap() {
        let definitions = vec![
            GroupDefinition::new("X", ["A01-A02"]),
            GroupDefinition::new("Y", ["A02-A03"]),
        ];
        let assignment = assign(&definitions).unwrap();

        assert_eq!(assignment.len(), 3);
        assert_eq!(assignment.get(&w("A01")), Some("X"));
        assert_eq!(assignment.get(&w("A02")), Some("Y"));
        assert_eq!(assignment.get(&w("A03")), Some("Y"));
        assert_eq!(
            assignment.reassignments(),
            &[Reassignment {
                well: w("A02"),
                previous: "X".to_string(),
                group: "Y".to_string(),
            }]
        );
    }

    #[test]
    fn test_overlap_within_group_is_harmless() {
        let definitions = vec![GroupDefinition::new("Control", ["A1-A4", "A3-A6"])];
        let assignment = assign(&definitions).unwrap();
        assert_eq!(assignment.wells_in("Control").len(), 6);
        assert!(assignment.reassignments().is_empty());
    }

    #[test]
    fn test_malformed_token_is_skipped() {
        let definitions = vec![GroupDefinition::new("Drug", ["A1-A2", "nonsense", "B1-B2"])];
        let assignment = assign(&definitions).unwrap();

        assert_eq!(assignment.wells_in("Drug"), vec![w("A01"), w("A02"), w("B01"), w("B02")]);
        assert_eq!(assignment.skipped_tokens().len(), 1);
        assert_eq!(assignment.skipped_tokens()[0].expression, "nonsense");
    }

    #[test]
    fn test_empty_group_name_rejected() {
        let definitions = vec![
            GroupDefinition::new("Control", ["A1-A2"]),
            GroupDefinition::new("  ", ["B1-B2"]),
        ];
        assert!(matches!(
            assign(&definitions),
            Err(PlateError::InvalidGroupName(_))
        ));
    }

    #[test]
    fn test_diagonal_range_aborts() {
        let definitions = vec![GroupDefinition::new("Control", ["A1-B2"])];
        assert!(matches!(
            assign(&definitions),
            Err(PlateError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_strict_mode_rejects_conflicts() {
        let definitions = vec![
            GroupDefinition::new("X", ["A1-A2"]),
            GroupDefinition::new("Y", ["A2-A3"]),
        ];
        let err = GroupAssigner::new().with_strict(true).assign(&definitions).unwrap_err();
        match err {
            PlateError::ConflictingAssignment { well, existing, incoming } => {
                assert_eq!(well, w("A02"));
                assert_eq!(existing, "X");
                assert_eq!(incoming, "Y");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_group_or_default() {
        let assignment = assign(&[GroupDefinition::new("X", ["C3-C3"])]).unwrap();
        assert_eq!(assignment.group_or(&w("C03"), "Unknown"), "X");
        assert_eq!(assignment.group_or(&w("C04"), "Unknown"), "Unknown");
    }
}
