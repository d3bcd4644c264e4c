//! Подсистема Publish–Subscribe на именованных курьерах.
//!
//! - `registry`: таблица курьеров «имя → экземпляр» (один курьер на имя).
//! - `courier`: маршруты курьера, регистрация, отмена и синхронная доставка.
//! - `subscriber`: обработчики, контекст подписки и данные доставки.

pub mod courier;
pub mod registry;
pub mod subscriber;

pub use courier::*;
pub use registry::*;
pub use subscriber::*;
