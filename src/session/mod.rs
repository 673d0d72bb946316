pub(crate) mod page_session;
