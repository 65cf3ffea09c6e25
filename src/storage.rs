//! Holds the request cookie header and the pending response cookies
use std::{cell::RefCell, rc::Rc};

use crate::config::CookieConfig;

/// A `Set-Cookie` value waiting to be attached to the response
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingCookie {
    pub(crate) name: String,
    pub(crate) header: String,
}

#[derive(Clone)]
pub struct Storage {
    pub(crate) config: Rc<CookieConfig>,
    pub(crate) request_header: Rc<Option<String>>,
    pub(crate) response_storage: Rc<RefCell<Vec<PendingCookie>>>,
}
impl Storage {
    pub(crate) fn new(config: Rc<CookieConfig>, request_header: Option<String>) -> Self {
        Storage {
            config,
            request_header: Rc::new(request_header),
            response_storage: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub(crate) fn push(&self, name: String, header: String) {
        self.response_storage
            .borrow_mut()
            .push(PendingCookie { name, header });
    }

    /// Drops pending cookies with `name`, returns how many were dropped
    pub(crate) fn discard(&self, name: &str) -> usize {
        let mut pending = self.response_storage.borrow_mut();
        let before = pending.len();
        pending.retain(|cookie| cookie.name != name);
        before - pending.len()
    }

    /// Takes every pending `Set-Cookie` value, in insertion order
    pub(crate) fn take_headers(&self) -> Vec<String> {
        self.response_storage
            .take()
            .into_iter()
            .map(|cookie| cookie.header)
            .collect()
    }
}
