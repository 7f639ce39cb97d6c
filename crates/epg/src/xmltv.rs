use chrono::Utc;
use chrono_tz::Tz;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use stream_resolvers::ChannelRecord;

use crate::error::GuideError;
use crate::schedule::{GUIDE_TZ, generate_blocks};

const GENERATOR_NAME: &str = "youtube-live-epg";
const GENERATOR_URL: &str = "https://github.com/MIFNtechnology/GetM3u8";
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S %z";
const EMPTY_DESCRIPTION: &str = "No description provided";

/// Builds the XMLTV guide document from the accumulated channel records.
///
/// A pure transform over already-resolved data; the only failure mode is
/// the serialization layer itself.
#[derive(Debug)]
pub struct GuideBuilder {
    tz: Tz,
}

impl Default for GuideBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GuideBuilder {
    pub fn new() -> Self {
        Self { tz: GUIDE_TZ }
    }

    pub fn build(&self, records: &[ChannelRecord]) -> Result<Vec<u8>, GuideError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let mut tv = BytesStart::new("tv");
        tv.push_attribute(("generator-info-name", GENERATOR_NAME));
        tv.push_attribute(("generator-info-url", GENERATOR_URL));
        writer.write_event(Event::Start(tv))?;

        for record in records {
            self.write_channel(&mut writer, record)?;
            self.write_programmes(&mut writer, record)?;
        }

        writer.write_event(Event::End(BytesEnd::new("tv")))?;
        Ok(writer.into_inner())
    }

    fn write_channel(
        &self,
        writer: &mut Writer<Vec<u8>>,
        record: &ChannelRecord,
    ) -> Result<(), GuideError> {
        let mut channel = BytesStart::new("channel");
        channel.push_attribute(("id", record.id.as_str()));
        writer.write_event(Event::Start(channel))?;

        let mut name = BytesStart::new("display-name");
        name.push_attribute(("lang", "en"));
        writer.write_event(Event::Start(name))?;
        writer.write_event(Event::Text(BytesText::new(&record.name)))?;
        writer.write_event(Event::End(BytesEnd::new("display-name")))?;

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        Ok(())
    }

    fn write_programmes(
        &self,
        writer: &mut Writer<Vec<u8>>,
        record: &ChannelRecord,
    ) -> Result<(), GuideError> {
        // Each channel gets its own window anchored to "now" at build time.
        let blocks = generate_blocks(Utc::now().with_timezone(&self.tz));

        let title = if record.title.is_empty() {
            format!("LIVE: {}", record.name)
        } else {
            record.title.clone()
        };
        let description = if record.description.is_empty() {
            EMPTY_DESCRIPTION
        } else {
            record.description.as_str()
        };

        for block in blocks {
            let start = block.start.format(TIMESTAMP_FORMAT).to_string();
            let stop = block.end.format(TIMESTAMP_FORMAT).to_string();

            let mut programme = BytesStart::new("programme");
            programme.push_attribute(("channel", record.id.as_str()));
            programme.push_attribute(("start", start.as_str()));
            programme.push_attribute(("stop", stop.as_str()));
            writer.write_event(Event::Start(programme))?;

            let mut title_el = BytesStart::new("title");
            title_el.push_attribute(("lang", "en"));
            writer.write_event(Event::Start(title_el))?;
            writer.write_event(Event::Text(BytesText::new(&title)))?;
            writer.write_event(Event::End(BytesEnd::new("title")))?;

            let mut desc_el = BytesStart::new("desc");
            desc_el.push_attribute(("lang", "en"));
            writer.write_event(Event::Start(desc_el))?;
            writer.write_event(Event::Text(BytesText::new(description)))?;
            writer.write_event(Event::End(BytesEnd::new("desc")))?;

            let mut icon = BytesStart::new("icon");
            icon.push_attribute(("src", record.image_url.as_str()));
            writer.write_event(Event::Empty(icon))?;

            writer.write_event(Event::End(BytesEnd::new("programme")))?;
        }

        Ok(())
    }
}
