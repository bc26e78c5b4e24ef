// This code was generated by replayc. Please regenerate instead of editing.
pub mod fragments {
    pub enum Fragment {}

    impl Fragment {
        #[allow(unused_mut, unused_variables)]
        pub fn emit<S: ::replayc::ContentHandler + ?Sized>(sink: &mut S, n: usize) -> ::core::result::Result<(), S::Error> {
            let mut attrs = ::replayc::Attributes::new();
            for _ in 0..n {
            attrs.clear();
            attrs.add("", "id", "id", "CDATA", "c");
            sink.start_element("", "child", "child", &attrs)?;
            sink.characters(&Self::CHARS[0..4])?;
            sink.end_element("", "child", "child")?;
            }
            Ok(())
        }

        #[allow(dead_code)]
        const CHARS: &'static str = "text";
    }
}
