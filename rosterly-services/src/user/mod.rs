/// Tenant membership mutation services
///
/// Role edits and member removals for the current tenant, each validated
/// against the plan-ownership and self-mutation rules and applied inside a
/// single unit of work.
///
/// # Request lifecycle
///
/// ```text
/// Received → Validating → (Rejected | TransactionOpen)
///                              → Mutating → (Committed | RolledBack)
/// ```
///
/// `Rejected` and `RolledBack` surface the originating error unchanged;
/// retries are the caller's concern.

pub mod destroyer;
pub mod editor;
pub mod input;
pub mod rules;

pub use destroyer::UserDestroyer;
pub use editor::UserEditor;
pub use input::{OneOrMany, RemoveUsersInput, UpdateRolesInput};
