mod cancel_order;
mod match_order;
mod place_order;

pub use cancel_order::{CancelError, CancelOrderUseCase};
pub use match_order::{MatchError, MatchOrderUseCase};
pub use place_order::{PlaceOrderCommand, PlaceOrderError, PlaceOrderUseCase};
