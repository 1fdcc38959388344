// Providers layer - Work performers and business logic
//
// Providers contain business logic and provide composable operations that
// coordinators can orchestrate. They never open or commit transactions; the
// caller passes the connection or transaction to run on.

pub mod access_policy;
pub mod cascade_provider;
pub mod counter_provider;
pub mod crypto_provider;
pub mod relationship_provider;
pub mod token_provider;

pub use access_policy::AccessPolicy;
pub use cascade_provider::CascadeProvider;
pub use counter_provider::CounterProvider;
pub use crypto_provider::CryptoProvider;
pub use relationship_provider::RelationshipProvider;
pub use token_provider::TokenProvider;
