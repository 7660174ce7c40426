//! Partitioning of a snapshot into display sections.

use crate::registry::Category;

use super::snapshot::{HealthSnapshot, ProbeResult};

/// A display section, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SectionKind {
    Infrastructure,
    Database,
    ApplicationServices,
    Frontend,
    Tunnel,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Infrastructure,
        SectionKind::Database,
        SectionKind::ApplicationServices,
        SectionKind::Frontend,
        SectionKind::Tunnel,
    ];

    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Infra => SectionKind::Infrastructure,
            Category::Database => SectionKind::Database,
            Category::Api => SectionKind::ApplicationServices,
            Category::Frontend => SectionKind::Frontend,
            Category::Tunnel => SectionKind::Tunnel,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Infrastructure => "Infrastructure",
            SectionKind::Database => "Database",
            SectionKind::ApplicationServices => "Application Services",
            SectionKind::Frontend => "Frontend",
            SectionKind::Tunnel => "SSH Tunnel(s)",
        }
    }
}

/// A non-empty group of results sharing a section.
#[derive(Debug, Clone)]
pub struct Section<'a> {
    pub kind: SectionKind,
    pub entries: Vec<&'a ProbeResult>,
}

impl Section<'_> {
    /// Header text; the application section also shows its size.
    pub fn header(&self) -> String {
        match self.kind {
            SectionKind::ApplicationServices => {
                format!("{} ({})", self.kind.title(), self.entries.len())
            }
            kind => kind.title().to_string(),
        }
    }
}

/// Split a snapshot into sections.
///
/// Every result lands in exactly one section. Sections keep snapshot order
/// and empty sections are dropped.
pub fn partition(snapshot: &HealthSnapshot) -> Vec<Section<'_>> {
    SectionKind::ALL
        .iter()
        .map(|&kind| Section {
            kind,
            entries: snapshot
                .results
                .iter()
                .filter(|r| SectionKind::for_category(r.target.category) == kind)
                .collect(),
        })
        .filter(|section| !section.entries.is_empty())
        .collect()
}
