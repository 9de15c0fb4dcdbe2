use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
#[error("Retry failed")]
pub struct RetryFailed;

// Run a fallible send, allowing up to `times` additional attempts before
// giving up.
pub fn retry<T, E, F>(times: u32, f: F) -> Result<T, RetryFailed>
where
    F: Fn() -> Result<T, E>,
    E: std::error::Error,
{
    let mut attempts_left = times;
    loop {
        match f() {
            Ok(value) => return Ok(value),
            Err(err) if attempts_left == 0 => {
                warn!("No more retry attempts. Error: {}", err);
                return Err(RetryFailed);
            }
            Err(err) => {
                warn!("Retry triggered. Error: {}", err);
                attempts_left -= 1;
            }
        }
    }
}
