//! Package implement fully persistent Red-Black tree, along with ordered
//! map and ordered set types built on top of it.
//!
//! Quoting from [Wikipedia][pds]:
//!
//! > A data structure is *partially persistent* if all versions can be
//! > accessed but only the newest version can be modified. The data
//! > structure is *fully persistent* if every version can be both accessed
//! > and modified.
//!
//! Every mutation on a tree returns a new root, while all previously
//! returned roots remain valid and unmodified. Unchanged sub-trees are
//! shared between versions, so each mutation allocates only O(log n)
//! nodes. Insertion follows [Okasaki][okasaki] and deletion follows the
//! Germane-Might extension, which uses transient double-black nodes and
//! double-empty leaves to track a black-height deficit while the
//! deletion recursion walks back up the tree.
//!
//! Following types are provided, under [rc] and [arc] modules:
//!
//! * `Tree` is the raw engine, search / insert / delete / count / iter.
//! * `RbMap` implements a persistent ordered-map.
//! * `RbSet` implements a persistent ordered-set.
//!
//! Types under [rc] use `std::rc::Rc` for structural sharing, they are
//! faster but not thread safe. Types under [arc] use `std::sync::Arc`
//! and can be shared across threads. [SharedMap] holds the latest
//! version of an `arc::RbMap` and publishes new versions atomically,
//! for applications that want an in-place update vocabulary.
//!
//! Constructing a new map and CRUD operations:
//!
//! ```
//! use prbt::rc::RbMap;
//!
//! let index: RbMap<String, String> = RbMap::new();
//! assert_eq!(index.len(), 0);
//! assert_eq!(index.is_empty(), true);
//!
//! let index = index.insert("key1".to_string(), "value1".to_string());
//! let index = index.insert("key2".to_string(), "value2".to_string());
//! assert_eq!(index.len(), 2);
//!
//! let older = index.clone();
//! let index = index.remove("key1");
//!
//! assert_eq!(index.get("key1"), None);
//! assert_eq!(older.get("key1"), Some(&"value1".to_string()));
//! assert_eq!(index.get("key2"), Some(&"value2".to_string()));
//! ```
//!
//! [pds]: https://en.wikipedia.org/wiki/Persistent_data_structure
//! [okasaki]: https://www.cs.tufts.edu/comp/150FP/archive/chris-okasaki/redblack99.pdf

use std::{error, fmt, result};

// Short form to compose Error values.
//
// Here are few possible ways:
//
// ```ignore
// use crate::Error;
// err_at!(Fatal, msg: format!("bad argument"));
// ```
//
// ```ignore
// use crate::Error;
// err_at!(Fatal, std::fs::read(file_path), format!("read failed"));
// ```
//
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        let prefix = format!("{}:{}", file!(), line!());
        Err(Error::$v(prefix, format!($($arg),+)))
    }};
    ($v:ident, $e:expr) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                Err(Error::$v(prefix, format!("{}", err)))
            }
        }
    }};
    ($v:ident, $e:expr, $($arg:expr),+) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                let msg = format!($($arg),+);
                Err(Error::$v(prefix, format!("{} {}", err, msg)))
            }
        }
    }};
}

pub mod arc;
mod datum;
mod op;
pub mod rc;
mod shared;

pub use datum::Datum;
pub use op::Write;
pub use shared::{SharedMap, Wr};

/// Error variants that are returned by this package's API.
///
/// Each variant carries a prefix, typically identifying the
/// error location.
pub enum Error {
    Fatal(String, String),
    KeyNotFound(String, String),
    InvalidCAS(String, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        use Error::*;

        match self {
            Fatal(p, msg) => write!(f, "{} Fatal: {}", p, msg),
            KeyNotFound(p, msg) => write!(f, "{} KeyNotFound: {}", p, msg),
            InvalidCAS(p, msg) => write!(f, "{} InvalidCAS: {}", p, msg),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        write!(f, "{}", self)
    }
}

impl error::Error for Error {}

/// Type alias for Result return type, used by this package.
pub type Result<T> = result::Result<T, Error>;
