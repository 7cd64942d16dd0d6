//! Reactive state layer between `rosterly-api` and UI consumers.
//!
//! This crate owns the business logic, domain model, and reactive state
//! infrastructure for the roster console:
//!
//! - **[`Console`]** — Central facade wiring the HTTP client, the shared
//!   runtime plumbing, and the five feature modules into one cheaply-
//!   cloneable handle. Shells drive everything through it.
//!
//! - **Feature modules** ([`modules`]) — One model per console screen
//!   (`groups`, `person`, `cards`, `users`, `login`). Each owns a state
//!   slice mutated only by its reducer; its effect methods return
//!   futures that raise the matching loading flag before the caller
//!   ever polls them.
//!
//! - **Runtime** ([`runtime`]) — The machinery the modules share:
//!   [`ActionType`] keys, the loading tree, the settled-signal bus that
//!   lets one module's effect wait on another module's data, effect
//!   scopes, and the [`Notice`] channel for user-visible results.
//!
//! - **Denormalization** ([`adapt`]) — Wire records carry comma-joined
//!   group-id lists and raw avatar references; [`adapt`] resolves them
//!   through an identity-memoized [`GroupIndex`] and rewrites avatars
//!   per the [`ImagePolicy`].
//!
//! - **Domain model** ([`model`]) — Canonical [`Group`], [`Person`],
//!   and [`Card`] types as the UI consumes them.

pub mod adapt;
pub mod config;
pub mod console;
pub mod error;
pub mod model;
pub mod modules;
pub mod runtime;

// ── Primary re-exports ──────────────────────────────────────────────
pub use adapt::{GroupIndex, ImagePolicy};
pub use config::{ConsoleConfig, TlsVerification};
pub use console::Console;
pub use error::CoreError;
pub use model::{Card, Group, Person};
pub use modules::{CardsModel, GroupsModel, LoginModel, PersonModel, UsersModel};
pub use runtime::{ActionType, Notice, NoticeLevel, Outcome, Signal, StateStream};
