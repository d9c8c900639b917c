pub(crate) use vitepress::error::Result;
