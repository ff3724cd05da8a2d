//! The pre-expanded "latest posts" block.

use std::fmt::Write;

use newsletter_rs_template::context::escape_html;

use crate::prepare::DigestPost;

const FONT: &str = "font-family: Inter, -apple-system, BlinkMacSystemFont, avenir next, avenir, helvetica neue, helvetica, ubuntu, roboto, noto, segoe ui, arial, sans-serif;";
const TABLE_STYLE: &str =
    "border-collapse: separate; mso-table-lspace: 0pt; mso-table-rspace: 0pt; width: 100%;";

/// Renders one table per post after the first, with a thumbnail column when
/// the post has a picture. Returns an empty string for one post or fewer.
///
/// Every value is HTML-escaped before it is placed in the markup.
pub fn additional_posts_html(posts: &[DigestPost]) -> String {
    let mut html = String::new();
    for post in posts.iter().skip(1) {
        write_post(&mut html, post);
    }
    html
}

fn write_post(html: &mut String, post: &DigestPost) {
    let url = escape_html(if post.url.is_empty() { "#" } else { post.url.as_str() });
    let title = escape_html(&post.title);
    let excerpt = escape_html(&post.excerpt);

    // Writing to a String cannot fail.
    let _ = write!(
        html,
        r#"
<table role="presentation" border="0" cellpadding="0" cellspacing="0" style="{TABLE_STYLE}" width="100%">
<tbody><tr>
<td class="latest-post" style="{FONT} font-size: 18px; vertical-align: top; color: #15212A; padding: 16px 0; max-width: 600px;" valign="top">
<table role="presentation" border="0" cellpadding="0" cellspacing="0" style="{TABLE_STYLE}" width="100%">
<tbody><tr>
<td valign="top" align="left" class="latest-post-title" style="{FONT} font-size: 18px; vertical-align: top; color: #15212A; padding-right: 12px;">
<h4 class="" style="margin-top: 0; {FONT} text-rendering: optimizeLegibility; line-height: 1.2em; margin: 0; padding: 2px 0 4px; font-size: 18px; font-weight: 700; color: #15212A;">
<a href="{url}" style="overflow-wrap: anywhere; text-decoration: none; color: #15212A;" target="_blank">{title}</a>
</h4>
<p class="latest-post-excerpt" style="line-height: 1.6em; margin: 0; padding: 0; font-size: 15px; font-weight: 400; color: #15212a; color: rgba(0, 0, 0, 0.6);">
<a href="{url}" style="overflow-wrap: anywhere; text-decoration: none; color: #15212a; color: rgba(0, 0, 0, 0.6);" target="_blank">{excerpt}</a>
</p>
</td>"#
    );

    if !post.picture.is_empty() {
        let picture = escape_html(&post.picture);
        let _ = write!(
            html,
            r#"
<td width="100" class="latest-post-img" style="{FONT} font-size: 18px; vertical-align: top; color: #15212A;" valign="top">
<a href="{url}" style="overflow-wrap: anywhere; display: block; height: 100px; overflow: hidden; color: inherit; text-decoration: none;" target="_blank">
<img src="{picture}" width="100" height="100" style="border: none; -ms-interpolation-mode: bicubic; max-width: 100%; object-fit: cover;">
</a>
</td>"#
        );
    }

    html.push_str(
        "
</tr>
</tbody></table>
</td>
</tr>
</tbody></table>",
    );
}
