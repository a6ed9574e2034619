//! Response containers and the machinery that builds them.
//!
//! Raw JSON is turned into [`ApiObject`] trees by a [`Materializer`], which
//! asks a [`TypeRegistry`] what each object is. The typed models in
//! [`models`] wrap those objects once their kind is known.

pub mod kind;
pub mod materialize;
pub mod models;
pub mod object;
pub mod registry;
pub mod value;

pub use kind::ObjectKind;
pub use materialize::{MaterializeOptions, Materializer, UnnestRules};
pub use models::{
    Account, ApiModel, Address, Buy, Checkout, CurrentUser, Deposit, Merchant, Money, Notification, Order,
    PaymentMethod, Report, Sell, Transaction, Transfer, User, Withdrawal,
};
pub use object::{AccountRef, ApiObject, Identity, ResponseMeta};
pub use registry::TypeRegistry;
pub use value::ApiValue;
