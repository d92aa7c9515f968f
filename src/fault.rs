//! Failure reporting by unwinding.
//!
//! [`raise`] stores the reason in a thread-local slot and unwinds with a zero-sized payload, so
//! raising never allocates. [`catch`] stops the unwind and takes the reason back out. Panics that
//! did not come from [`raise`] pass through [`catch`] untouched.

use crate::ReasonCode;
use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

thread_local! {
    static FAULT: Cell<Option<ReasonCode>> = const { Cell::new(None) };
}

// Unwind payload. Being a ZST, boxing it does not allocate.
struct FaultPanic;

/// A structured fault caught by [`catch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fault {
    pub code: ReasonCode,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fault raised with reason code {}", self.code.0)
    }
}

impl std::error::Error for Fault {}

/// Unwind to the nearest [`catch`] on this thread.
///
/// This uses [`panic::resume_unwind`], which skips the panic hook: no message is printed and no
/// backtrace is captured. Calling it with no [`catch`] on the stack ends the thread like any
/// other panic.
#[cold]
#[inline(never)]
pub fn raise(code: ReasonCode) -> ! {
    FAULT.with(|slot| slot.set(Some(code)));
    panic::resume_unwind(Box::new(FaultPanic))
}

/// Run `f`, turning a [`raise`] inside it into `Err`.
///
/// ```
/// use errsig::{fault, ReasonCode};
///
/// let caught = fault::catch(|| -> f64 { fault::raise(ReasonCode::FAIL) });
/// assert_eq!(caught.unwrap_err().code, ReasonCode::FAIL);
/// assert_eq!(fault::catch(|| 1.5), Ok(1.5));
/// ```
#[inline]
pub fn catch<T>(f: impl FnOnce() -> T) -> Result<T, Fault> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(
        #[cold]
        |payload| {
            if !payload.is::<FaultPanic>() {
                panic::resume_unwind(payload);
            }
            let code = FAULT.with(Cell::take).unwrap_or(ReasonCode::FAIL);
            Fault { code }
        },
    )
}
