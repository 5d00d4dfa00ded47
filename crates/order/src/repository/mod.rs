mod cashier;
mod merchant;
mod order;
mod order_item;
mod product;

pub use self::cashier::CashierQueryRepository;
pub use self::merchant::MerchantQueryRepository;
pub use self::order::{OrderCommandRepository, OrderQueryRepository};
pub use self::order_item::{OrderItemCommandRepository, OrderItemQueryRepository};
pub use self::product::{ProductCommandRepository, ProductQueryRepository};
