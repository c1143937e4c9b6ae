//! `rov-behavior` — the reusable state-node library.
//!
//! # Crate layout
//!
//! | Module        | Nodes                                                     |
//! |---------------|-----------------------------------------------------------|
//! | [`halt`]      | `HaltNode` — idle with optional auto-scan sweep           |
//! | [`avoiding`]  | `AvoidingNode` — radar-assisted contact escape            |
//! | [`mapping`]   | `MappingNode` — sweep/turn micro-FSM building the map     |
//! | [`move_to`]   | `MoveToNode` — reach a target point with final facing     |
//! | [`move_path`] | `MovePathNode` — walk a planned polyline                  |
//! | [`search`]    | `SearchMoveNode` — RRT plan + walk (label / refresh)      |
//! | [`find`]      | `FindLabelNode`, `FindUnknownNode` — A\* sector planners  |
//! | [`label_stuck`] | `LabelStuckNode` — approach-and-hold at a label         |
//! | [`points`]    | `ExploringPointNode`, `LabelPointNode`, `CautiousPointNode` |
//! | [`clear_map`] | `ClearMapNode`                                            |
//!
//! Every node embeds a [`rov_state::NodeBase`] for the shared concerns
//! (timeout, entry stamp, namespaced keys, declarative hooks, contact
//! guard) and is configured by a serde-deserialized config struct whose
//! fields all carry documented defaults.

pub mod avoiding;
pub mod clear_map;
pub mod find;
pub mod halt;
pub mod label_stuck;
pub mod mapping;
pub mod move_path;
pub mod move_to;
pub mod points;
pub mod search;

mod motion;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use avoiding::{AvoidingConfig, AvoidingNode};
pub use clear_map::ClearMapNode;
pub use find::{FindConfig, FindLabelNode, FindUnknownNode};
pub use halt::{HaltConfig, HaltNode};
pub use label_stuck::{LabelStuckConfig, LabelStuckNode};
pub use mapping::{MappingConfig, MappingNode};
pub use move_path::{MovePathConfig, MovePathNode};
pub use move_to::{MoveToConfig, MoveToNode};
pub use points::{
    CautiousPointConfig, CautiousPointNode, ExploringPointConfig, ExploringPointNode,
    LabelPointConfig, LabelPointNode,
};
pub use search::{SearchConfig, SearchMoveNode};
