pub mod column_order;
pub mod entities;
pub mod filter;
pub mod record;
pub mod selection;
pub mod sort;
