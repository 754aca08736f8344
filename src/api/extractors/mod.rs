pub mod principal;

pub use principal::{Authenticated, FirebaseUserPrincipal, firebase_user_principal};
