use crate::models::banner::{
    BannerSettings, ContentType, Decision, DisplayPayload, RequestContext, VisibilityType,
};

/// Decide whether the banner shows on this page view.
///
/// Checks run in order and the first failing one suppresses: blank message,
/// schedule window (both bounds inclusive), then the visibility rule. The
/// result is meant to be computed once per view and shared by everything
/// that emits banner output, so style and markup never disagree.
pub fn evaluate(settings: &BannerSettings, ctx: &RequestContext) -> Decision {
    if settings.message.trim().is_empty() {
        return Decision::Suppressed;
    }

    if settings.start_at.is_some_and(|start| ctx.now < start)
        || settings.end_at.is_some_and(|end| ctx.now > end)
    {
        return Decision::Suppressed;
    }

    if !is_visible_on(settings, ctx) {
        return Decision::Suppressed;
    }

    Decision::Show(DisplayPayload {
        message: settings.message.clone(),
        background_color: settings.background_color.clone(),
        text_color: settings.text_color.clone(),
        font_size_px: settings.font_size_px,
        show_close_button: settings.show_close_button,
    })
}

fn is_visible_on(settings: &BannerSettings, ctx: &RequestContext) -> bool {
    match settings.visibility_type {
        VisibilityType::SiteWide => true,
        VisibilityType::HomepageOnly => ctx.is_homepage,
        VisibilityType::SpecificArticles => {
            ctx.content_type == ContentType::Article
                && ctx
                    .page_id
                    .is_some_and(|id| settings.selected_article_ids.contains(&id))
        }
        VisibilityType::SpecificPages => {
            ctx.content_type == ContentType::Page
                && ctx
                    .page_id
                    .is_some_and(|id| settings.selected_page_ids.contains(&id))
        }
    }
}
