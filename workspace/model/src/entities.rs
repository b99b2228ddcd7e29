//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the food-ordering backend here:
//! identity (users), catalog (restaurants, products) and the order
//! domain (orders, order_items).

pub mod order;
pub mod order_item;
pub mod product;
pub mod restaurant;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::order::Entity as Order;
    pub use super::order_item::Entity as OrderItem;
    pub use super::product::Entity as Product;
    pub use super::restaurant::Entity as Restaurant;
    pub use super::user::Entity as User;
}
