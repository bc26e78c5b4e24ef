// This code was generated by replayc. Please regenerate instead of editing.
pub enum Sample {}

impl Sample {
    #[allow(unused_mut, unused_variables)]
    pub fn emit<S: ::replayc::ContentHandler + ?Sized>(sink: &mut S) -> ::core::result::Result<(), S::Error> {
        let mut attrs = ::replayc::Attributes::new();
        let result = (|| -> ::core::result::Result<(), S::Error> {
            sink.start_document()?;
            sink.start_prefix_mapping("", "urn:example")?;
            sink.start_prefix_mapping("x", "urn:x")?;
            attrs.clear();
            attrs.add("urn:x", "id", "x:id", "CDATA", "7");
            attrs.add("", "lang", "lang", "CDATA", "en");
            sink.start_element("urn:example", "doc", "doc", &attrs)?;
            sink.characters(&Self::CHARS[0..1])?;
            sink.processing_instruction("note", "keep \"this\"")?;
            sink.characters(&Self::CHARS[1..2])?;
            attrs.clear();
            sink.start_element("urn:example", "p", "p", &attrs)?;
            sink.characters(&Self::CHARS[2..9])?;
            attrs.clear();
            sink.start_element("urn:x", "b", "x:b", &attrs)?;
            sink.characters(&Self::CHARS[9..15])?;
            sink.end_element("urn:x", "b", "x:b")?;
            sink.characters(&Self::CHARS[15..27])?;
            sink.end_element("urn:example", "p", "p")?;
            sink.characters(&Self::CHARS[27..28])?;
            sink.end_element("urn:example", "doc", "doc")?;
            sink.end_prefix_mapping("")?;
            sink.end_prefix_mapping("x")?;
            Ok(())
        })();
        let end = sink.end_document();
        result.and(end)
    }

    #[allow(dead_code)]
    const CHARS: &'static str = "\n\nHello, wörld & \"friends\"\n";
}
