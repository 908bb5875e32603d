//! Aggregates module
pub mod product;
pub mod order;
pub mod cart;

pub use product::{Product, ProductError, ProductStatus};
pub use order::{Charges, LineItem, Order, OrderError, OrderStatus};
pub use cart::{Cart, CartError, CartItem};
