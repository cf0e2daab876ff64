use crate::boxes::{BoxHeader, FourCC};
use crate::cursor::ByteCursor;
use crate::error::{Error, Result};

/// Which box tags a handler accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    Tag(FourCC),
    Any,
}

impl Matcher {
    pub fn accepts(&self, tag: &FourCC) -> bool {
        match self {
            Matcher::Tag(t) => t == tag,
            Matcher::Any => true,
        }
    }
}

/// Parse action invoked with the cursor positioned right after the box header.
///
/// `S` is the parse state the handlers of one walk share. Handlers may consume
/// any amount of the payload; the walker re-synchronizes afterwards.
pub type Action<R, S> = fn(&mut ByteCursor<R>, &BoxHeader, &mut S) -> Result<()>;

pub struct Handler<R, S> {
    pub name: &'static str,
    pub matcher: Matcher,
    pub action: Action<R, S>,
}

/// Ordered handler table: the first handler whose matcher accepts a tag wins.
///
/// A registry always holds at least one [`Matcher::Any`] handler, so every tag
/// dispatches somewhere.
pub struct Registry<R, S> {
    handlers: Vec<Handler<R, S>>,
}

pub struct RegistryBuilder<R, S> {
    handlers: Vec<Handler<R, S>>,
}

impl<R, S> Registry<R, S> {
    pub fn builder() -> RegistryBuilder<R, S> {
        RegistryBuilder { handlers: Vec::new() }
    }

    pub fn dispatch(&self, tag: &FourCC) -> Result<&Handler<R, S>> {
        self.handlers
            .iter()
            .find(|h| h.matcher.accepts(tag))
            .ok_or(Error::NoSuchHandler { tag: *tag })
    }
}

impl<R, S> RegistryBuilder<R, S> {
    /// Append a handler. Registration order is dispatch order.
    pub fn handler(mut self, name: &'static str, matcher: Matcher, action: Action<R, S>) -> Self {
        self.handlers.push(Handler { name, matcher, action });
        self
    }

    /// Finish with the catch-all skip handler appended.
    pub fn build_with_skip(self) -> Registry<R, S> {
        let handlers = self.handler("skip", Matcher::Any, skip).handlers;
        Registry { handlers }
    }

    /// Finish as-is. Fails with [`Error::NoSuchHandler`] when no handler
    /// accepts arbitrary tags.
    pub fn build(self) -> Result<Registry<R, S>> {
        match self.handlers.iter().find(|h| h.matcher == Matcher::Any) {
            Some(_) => Ok(Registry { handlers: self.handlers }),
            None => Err(Error::NoSuchHandler { tag: FourCC(*b"****") }),
        }
    }
}

/// Consumes nothing; the walker moves past the box.
pub fn skip<R, S>(_r: &mut ByteCursor<R>, _hdr: &BoxHeader, _state: &mut S) -> Result<()> {
    Ok(())
}
