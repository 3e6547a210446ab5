mod record;
mod session;

pub use record::{Notification, Record, RecordId};
pub use session::{Credentials, LoginResponse, Session, UserIdentity, UserLabel};
