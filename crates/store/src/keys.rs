//! Storage keys shared by the stores.
//!
//! The values match blobs written by earlier versions of the application so
//! existing data keeps loading.

/// Product collection blob.
pub const PRODUCTS: &str = "inventario_basico_v1";

/// Account collection blob.
pub const USERS: &str = "inventario360_users_v1";

/// Single active session blob.
pub const SESSION: &str = "inventario360_session_v1";

/// One-shot notice shown after a guard redirect.
pub const NOTICE: &str = "inventario360_notice";
