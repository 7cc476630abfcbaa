/// User record as seen by the credential boundary.
///
/// The service never owns user persistence; whatever directory backs this
/// record only has to produce these four fields for a login decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    /// Coarse authorization tag carried into issued tokens ("user", "admin")
    pub role: String,
    /// One-way hash in PHC string format; opaque to everything but the
    /// password verifier
    pub password_hash: String,
}
