use crate::models::{DesignOptions, GeneratedTexts, PageRole, Venue};

/// Per-request context shared by every page prompt.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub venue: &'a Venue,
    pub design: &'a DesignOptions,
    pub has_style_image: bool,
    pub has_content_image: bool,
}

struct PageBrief {
    page_type: &'static str,
    main_content: &'static str,
    additional_elements: &'static str,
    design_notes: &'static str,
}

fn brief(role: PageRole) -> PageBrief {
    match role {
        PageRole::Cover => PageBrief {
            page_type: "wedding photo cover page",
            main_content: "the couple's wedding photo placed in the center",
            additional_elements: "an elegant border and subtle ornaments",
            design_notes: "clean and modern, the photo is the focal point",
        },
        PageRole::Greeting => PageBrief {
            page_type: "greeting page",
            main_content: "the greeting text",
            additional_elements: "floral decorations or a light pattern",
            design_notes: "use a highly legible font",
        },
        PageRole::Invitation => PageBrief {
            page_type: "invitation message page",
            main_content: "the invitation message",
            additional_elements: "graceful lines and ornaments",
            design_notes: "warm and welcoming",
        },
        PageRole::Location => PageBrief {
            page_type: "venue directions page",
            main_content: "the directions text together with the map",
            additional_elements: "small location and clock icons",
            design_notes: "balance the map and the text, map on top or centered",
        },
        PageRole::Closing => PageBrief {
            page_type: "closing thanks page",
            main_content: "the closing message",
            additional_elements: "a thank-you accent and decorations",
            design_notes: "warm and grateful",
        },
    }
}

/// Instruction sent to the image model for one page.
pub fn build_page_prompt(
    role: PageRole,
    texts: &GeneratedTexts,
    ctx: &PromptContext<'_>,
) -> String {
    let brief = brief(role);

    let style = if ctx.has_style_image {
        "Follow the colors, typography and ornament style of the provided style reference image."
    } else {
        "Use a soft, elegant palette suitable for a Korean wedding invitation."
    };

    let mut prompt = format!(
        "Design page {number} of a 5-page Korean mobile wedding invitation, portrait 3:4.\n\
         Page type: {page_type}\n\
         Style: {style}\n\
         Main content: {main_content}\n\
         Additional elements: {additional_elements}\n",
        number = role.page_number(),
        page_type = brief.page_type,
        style = style,
        main_content = brief.main_content,
        additional_elements = brief.additional_elements,
    );

    if let Some(text) = role.text(texts) {
        prompt.push_str(&format!(
            "Text to render exactly, in Korean, clearly legible:\n\"{}\"\n",
            text
        ));
    }

    if role == PageRole::Location {
        prompt.push_str(&format!("Venue: {}\nAddress: {}\n", ctx.venue.name, ctx.venue.address));
    }

    if ctx.has_content_image {
        let what = match role {
            PageRole::Location => "map snapshot",
            _ => "wedding photo",
        };
        prompt.push_str(&format!(
            "Place the provided {} on the page without altering the people or places in it.\n",
            what
        ));
    }

    if let Some(frame) = ctx.design.frame.as_deref().filter(|f| !f.is_empty()) {
        prompt.push_str(&format!("Frame: apply the '{}' border around the whole page.\n", frame));
    }

    if let (PageRole::Closing, Some(extra)) = (role, ctx.design.extra_message.as_deref()) {
        if !extra.is_empty() {
            prompt.push_str(&format!("Also include this note in small type: \"{}\"\n", extra));
        }
    }

    let notes = match ctx.design.additional_request.as_deref().filter(|r| !r.is_empty()) {
        Some(request) => format!("{}; {}", brief.design_notes, request),
        None => brief.design_notes.to_string(),
    };
    prompt.push_str(&format!("Design notes: {}\n", notes));
    prompt.push_str("Professional print quality. Do not add any text other than what is given.");

    prompt
}

/// Instruction for regenerating an existing page according to an edit request.
pub fn build_edit_prompt(edit_request: &str, has_reference: bool) -> String {
    let mut prompt = format!(
        "Edit the provided wedding invitation page as follows:\n{}\n\n\
         Keep the overall style, layout, tone and all existing text \
         unless the request says otherwise.",
        edit_request.trim()
    );
    if has_reference {
        prompt.push_str("\nUse the additional reference image as guidance for the change.");
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts() -> GeneratedTexts {
        GeneratedTexts {
            greeting: "봄날의 인사".into(),
            invitation: "저희 결혼합니다".into(),
            location: "강남역 3번 출구".into(),
            closing: "감사합니다".into(),
        }
    }

    #[test]
    fn each_page_carries_its_own_text() {
        let venue = Venue::new("서울 웨딩홀", "서울시 강남구");
        let design = DesignOptions::new();
        let ctx = PromptContext {
            venue: &venue,
            design: &design,
            has_style_image: true,
            has_content_image: false,
        };

        let cover = build_page_prompt(PageRole::Cover, &texts(), &ctx);
        assert!(cover.contains("page 1"));
        assert!(!cover.contains("봄날의 인사"));

        let greeting = build_page_prompt(PageRole::Greeting, &texts(), &ctx);
        assert!(greeting.contains("봄날의 인사"));
        assert!(!greeting.contains("감사합니다"));

        let location = build_page_prompt(PageRole::Location, &texts(), &ctx);
        assert!(location.contains("강남역 3번 출구"));
        assert!(location.contains("서울시 강남구"));
    }

    #[test]
    fn design_options_flow_into_prompt() {
        let venue = Venue::new("서울 웨딩홀", "서울시 강남구");
        let design = DesignOptions::new()
            .with_frame("classic_gold")
            .with_additional_request("잔잔한 분위기")
            .with_extra_message("주차 공간이 협소합니다");
        let ctx = PromptContext {
            venue: &venue,
            design: &design,
            has_style_image: false,
            has_content_image: true,
        };

        let closing = build_page_prompt(PageRole::Closing, &texts(), &ctx);
        assert!(closing.contains("classic_gold"));
        assert!(closing.contains("잔잔한 분위기"));
        assert!(closing.contains("주차 공간이 협소합니다"));

        let location = build_page_prompt(PageRole::Location, &texts(), &ctx);
        assert!(location.contains("map snapshot"));
        assert!(!location.contains("주차 공간이 협소합니다"));
    }

    #[test]
    fn edit_prompt_mentions_reference_only_when_given() {
        assert!(build_edit_prompt("make it pink", true).contains("reference image"));
        assert!(!build_edit_prompt("make it pink", false).contains("reference image"));
    }
}
