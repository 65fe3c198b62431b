#![allow(missing_docs)]

mod html;
mod remote;

pub(crate) use html::{assert_valid_html, text_of};
pub(crate) use remote::{FakeRemote, unreachable_url};
