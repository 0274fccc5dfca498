pub mod board;
pub mod card;
pub mod commands;
pub mod drag;
pub mod field_update;
pub mod list;
pub mod reorder;
pub mod store;

pub use board::{Board, BoardId, BoardSnapshot, ListSnapshot};
pub use card::{
    Card, CardId, CardLabel, CardMember, CardUpdate, DueStatus, Label, LabelId, MemberUser,
    NewCard, UserId,
};
pub use commands::{Command, MoveCard, ReorderCards, ReorderIntent, ReorderLists};
pub use drag::{DragGesture, DropLocation, ItemKind};
pub use field_update::FieldUpdate;
pub use list::{List, ListId};
pub use reorder::{
    CardPosition, CardReorderRequest, ListPosition, ListReorderRequest, ReorderRequest,
};
pub use store::NormalizedStore;
