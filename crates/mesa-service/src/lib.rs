//! # mesa-service: Front-of-House Services for Mesa POS
//!
//! Stateful, async-safe wrappers around [`mesa_core`]: the order desk, the
//! reservation book and the cash register, plus configuration and logging.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. MesaConfig::load(None)      defaults ◄ mesa.toml ◄ MESA_* env       │
//! │  2. telemetry::init_tracing     RUST_LOG or [logging] filter            │
//! │  3. FrontOfHouse::new(&config)  OrderDesk + ReservationBook + Register  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```rust,no_run
//! use mesa_service::{FrontOfHouse, MesaConfig};
//!
//! # async fn run() -> mesa_service::ServiceResult<()> {
//! let config = MesaConfig::load(None)?;
//! mesa_service::telemetry::init_tracing(&config.logging);
//! let house = FrontOfHouse::new(&config)?;
//! let order = house.orders.open_order(Some("T4".into())).await?;
//! # let _ = order;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod orders;
pub mod register;
pub mod reservations;
pub mod telemetry;

pub use config::MesaConfig;
pub use error::{ErrorCode, ServiceError, ServiceResult};
pub use orders::OrderDesk;
pub use register::CashRegister;
pub use reservations::{BookingRequest, ReservationBook};

/// The three desks wired from one configuration.
#[derive(Debug)]
pub struct FrontOfHouse {
    pub orders: OrderDesk,
    pub reservations: ReservationBook,
    pub register: CashRegister,
}

impl FrontOfHouse {
    pub fn new(config: &MesaConfig) -> ServiceResult<Self> {
        config.validate()?;
        Ok(FrontOfHouse {
            orders: OrderDesk::new(config)?,
            reservations: ReservationBook::new(config.reservations.clone()),
            register: CashRegister::new(config.cash_tolerance()),
        })
    }
}
