//! Core engine for mdplanner.
//! A project is one markdown file; every record kind lives in its own
//! section of that file and round-trips through a typed codec.

pub mod entity;
pub mod error;
pub mod logging;
pub mod markup;
pub mod model;
pub mod persist;
pub mod sections;
pub mod settings;
pub mod store;

pub use entity::{Record, SectionCodec};
pub use error::{StoreError, StoreResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use markup::section::{Document, SectionRegistry};
pub use model::analysis::{
    Brief, BusinessModelCanvas, LeanCanvas, ProjectValueBoard, Retrospective, RiskAnalysis,
    SwotAnalysis,
};
pub use model::billing::{BillingRate, Customer, Invoice, Payment, Quote};
pub use model::canvas::{C4Component, C4Connection, Mindmap, MindmapNode, StickyNote};
pub use model::capacity::{CapacityPlan, TeamMember, WeeklyAllocation};
pub use model::note::Note;
pub use model::planning::{Goal, Idea, IdeaWithBacklinks, Milestone};
pub use model::project::{ProjectConfig, ProjectInfo, ProjectMeta};
pub use model::strategy::{StrategicBuilder, StrategicLevel};
pub use model::task::{Board, BoardColumn, Task, TaskConfig};
pub use model::time::{TaskTimeLog, TimeEntry};
pub use persist::WriteDurability;
pub use settings::{SettingsError, StoreSettings};
pub use store::{project_filename, Clock, FixedClock, ProjectStore, SystemClock};

/// Version of the markdown engine, reported by the CLI next to the section
/// catalog it understands.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{engine_version, SectionRegistry};

    #[test]
    fn engine_version_is_semver() {
        let parts = engine_version().split('.').collect::<Vec<_>>();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|part| part.parse::<u32>().is_ok()));
    }

    #[test]
    fn standard_catalog_knows_board_and_notes() {
        let registry = SectionRegistry::standard();
        assert!(!registry.is_empty());
        assert!(registry.get("Board").is_some());
        assert!(registry.get("Notes").is_some());
    }
}
