use crate::models::banner::{Decision, DisplayPayload};

/// sessionStorage key recording that the visitor closed the banner.
pub const DISMISS_STORAGE_KEY: &str = "notice-bar-closed";

/// Render the banner fragment for a decision; suppressed decisions render nothing.
pub fn render_decision(decision: &Decision) -> String {
    decision.payload().map(render).unwrap_or_default()
}

/// HTML fragment injected at the top of the page.
///
/// The message is emitted as-is; it was cleaned by the sanitizer on the way in.
/// Colors and font size are already validated, so they go into the style block
/// unescaped.
pub fn render(payload: &DisplayPayload) -> String {
    let close_button = if payload.show_close_button {
        r#"<button type="button" class="notice-bar__close" aria-label="Close notification">&times;</button>"#
    } else {
        ""
    };

    format!(
        r#"<style>
.notice-bar {{
  position: fixed;
  top: 0;
  left: 0;
  right: 0;
  z-index: 99999;
  display: flex;
  align-items: center;
  justify-content: center;
  padding: 10px 40px;
  background-color: {bg};
  color: {fg};
  font-size: {size}px;
}}
.notice-bar.is-hidden {{ display: none; }}
.notice-bar__close {{
  position: absolute;
  right: 10px;
  background: none;
  border: 0;
  color: inherit;
  font-size: 1.5em;
  cursor: pointer;
}}
</style>
<div class="notice-bar" role="alert">
<div class="notice-bar__content">{message}</div>
{close_button}
</div>
<script>
(function () {{
  var bar = document.querySelector(".notice-bar");
  if (!bar) return;
  var key = "{key}";
  function reserve() {{ document.body.style.paddingTop = bar.offsetHeight + "px"; }}
  function dismiss() {{
    bar.classList.add("is-hidden");
    document.body.style.paddingTop = "0";
    window.removeEventListener("resize", reserve);
  }}
  if (window.sessionStorage && sessionStorage.getItem(key) === "true") {{
    dismiss();
    return;
  }}
  reserve();
  window.addEventListener("resize", reserve);
  var close = bar.querySelector(".notice-bar__close");
  if (close) {{
    close.addEventListener("click", function () {{
      dismiss();
      if (window.sessionStorage) sessionStorage.setItem(key, "true");
    }});
  }}
}})();
</script>
"#,
        bg = payload.background_color,
        fg = payload.text_color,
        size = payload.font_size_px,
        message = payload.message,
        close_button = close_button,
        key = DISMISS_STORAGE_KEY,
    )
}
