//! Shopping list data model shared by the items Lambda and the terminal client.

mod item;

pub use item::{timestamp, Item, ItemPatch, NewItem};
