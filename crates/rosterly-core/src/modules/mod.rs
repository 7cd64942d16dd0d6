// ── Feature modules ──
//
// One module per console feature: a state slice, its reducer actions,
// and the async effects that drive it. Model handles are cheap clones
// around shared inner state; their effect methods return futures that
// raise the loading flag before the caller ever polls them.

pub mod cards;
pub mod groups;
pub mod login;
pub mod person;
pub mod users;

pub use cards::CardsModel;
pub use groups::GroupsModel;
pub use login::LoginModel;
pub use person::PersonModel;
pub use users::UsersModel;

// Request shapes shared with the transport crate.
pub use rosterly_api::models::{CardFields, CardQuery, PersonUpdate, UserQuery};
