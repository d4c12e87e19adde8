//! HTML page rendering.
//!
//! A [`Renderer`] is built once at startup and shared read-only by every
//! request. It knows exactly two pages; it is not a template engine.

use notebook_core::{note::Note, notebook::NotebookName};
use quick_xml::escape::escape;
use url::form_urlencoded;

/// Sign-in or sign-out link shown in the page footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthLink {
  pub url:  String,
  pub text: &'static str,
}

/// Everything the listing page shows.
#[derive(Debug)]
pub struct ListingPage<'a> {
  pub notebook:  &'a NotebookName,
  pub notes:     &'a [Note],
  /// Total notes in the notebook; may exceed `notes.len()`.
  pub total:     u64,
  /// Identity of the viewer, used to mark their own notes.
  pub viewer_id: Option<&'a str>,
  pub map_url:   Option<String>,
  pub auth:      AuthLink,
}

#[derive(Debug, Clone)]
pub struct Renderer {
  site_title: String,
}

impl Renderer {
  pub fn new(site_title: impl Into<String>) -> Self {
    Self { site_title: site_title.into() }
  }

  fn head(&self, html: &mut String) {
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n");
    html.push_str(&format!("  <title>{}</title>\n", escape(&self.site_title)));
    html.push_str("</head>\n<body>\n");
  }

  pub fn render_listing(&self, page: &ListingPage<'_>) -> String {
    let mut html = String::with_capacity(4096);
    self.head(&mut html);

    let notebook = escape(page.notebook.as_str());
    html.push_str(&format!("<h1>{notebook}</h1>\n"));

    if page.notes.is_empty() {
      html.push_str("<p>No notes yet.</p>\n");
    }
    for note in page.notes {
      render_note(&mut html, note, page.viewer_id);
    }
    if page.total > page.notes.len() as u64 {
      html.push_str(&format!(
        "<p>Showing {} of {} notes.</p>\n",
        page.notes.len(),
        page.total
      ));
    }

    if let Some(map_url) = &page.map_url {
      html.push_str(&format!(
        "<img src=\"{}\" alt=\"Where notes were written\">\n",
        escape(map_url)
      ));
    }

    let sign_query = form_urlencoded::Serializer::new(String::new())
      .append_pair("notebook_name", page.notebook.as_str())
      .finish();
    html.push_str(&format!(
      "<form action=\"/sign?{}\" method=\"post\">\n\
       \x20 <div><label>Unit <input name=\"unit\"></label></div>\n\
       \x20 <div><label>Title <input name=\"title\"></label></div>\n\
       \x20 <div><textarea name=\"description\" rows=\"3\" cols=\"60\"></textarea></div>\n\
       \x20 <div><input type=\"submit\" value=\"Leave Note\"></div>\n\
       </form>\n<hr>\n",
      escape(&sign_query)
    ));

    html.push_str(&format!(
      "<form>Notebook name:\n\
       \x20 <input value=\"{notebook}\" name=\"notebook_name\">\n\
       \x20 <input type=\"submit\" value=\"switch\">\n\
       </form>\n"
    ));
    html.push_str(&format!(
      "<a href=\"{}\">{}</a>\n",
      escape(&page.auth.url),
      page.auth.text
    ));

    html.push_str("</body>\n</html>\n");
    html
  }

  pub fn render_error(&self) -> String {
    let mut html = String::with_capacity(512);
    self.head(&mut html);
    html.push_str(
      "<h1>Note not saved</h1>\n\
       <p>Unit, title and description are all required.</p>\n\
       <a href=\"/\">Back to the notebook</a>\n\
       </body>\n</html>\n",
    );
    html
  }
}

fn render_note(html: &mut String, note: &Note, viewer_id: Option<&str>) {
  match &note.author {
    Some(author) => {
      let you = match viewer_id {
        Some(id) if note.is_authored_by(id) => " (You)",
        _ => "",
      };
      html.push_str(&format!("<b>{}{you}</b> wrote:\n", escape(&author.email)));
    }
    None => html.push_str("An anonymous person wrote:\n"),
  }
  html.push_str(&format!(
    "<blockquote>\n\
     \x20 <strong>{}</strong> <em>({})</em>\n\
     \x20 <p>{}</p>\n\
     \x20 <small>{}</small>\n\
     </blockquote>\n",
    escape(&note.title),
    escape(&note.unit),
    escape(&note.description),
    note.date.format("%Y-%m-%d %H:%M UTC"),
  ));
}
