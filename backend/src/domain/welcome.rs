//! Welcome content seeded for every new account.
//!
//! Registration provisions one document with two pages and a sample gallery
//! so first-time users see a working multi-page document with an embedded
//! gallery reference. The whole seed is written in a single transaction by
//! the user repository.

use super::content::{DocumentTitle, GalleryName};

/// Title of the auto-provisioned document.
const WELCOME_DOCUMENT_TITLE: &str = "Your First Sharkdown Document";

/// Name of the sample gallery, referenced from the second page.
const WELCOME_GALLERY_NAME: &str = "Dogs and Cats";

const WELCOME_PAGE_1: &str = "\
# Welcome to Sharkdown!
This is a markdown document. Try clicking the pencil icon above
to open the editor.

Unlike most markdown editors, Sharkdown supports
documents with multiple pages and image galleries.
";

const WELCOME_PAGE_2: &str = "\
# Page 2
Click the + icon below this page to add a new page.

You can add galleries by clicking the \"Manage Galleries\" button above.
On mobile, the button is in the hamburger menu at the top right.

After adding a gallery, you can insert it into the document like so:

gallery(Dogs and Cats)
<br><br>
Click the highlighted gallery name to view the gallery.
";

/// Image paths seeded into the sample gallery, served from the static
/// `/welcomeImages` mount.
const WELCOME_IMAGE_PATHS: [&str; 5] = [
    "/welcomeImages/testImage1.jpg",
    "/welcomeImages/testImage2.jpg",
    "/welcomeImages/testImage3.jpg",
    "/welcomeImages/testImage4.jpg",
    "/welcomeImages/testImage5.jpg",
];

/// Everything the repository needs to seed a new account's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeSeed {
    pub document_title: DocumentTitle,
    /// Page bodies in order; positions are assigned from the index.
    pub page_contents: Vec<String>,
    pub gallery_name: GalleryName,
    /// Image paths in insertion order.
    pub image_paths: Vec<String>,
}

impl WelcomeSeed {
    /// The standard seed used at registration.
    pub fn standard() -> Self {
        Self {
            document_title: DocumentTitle::new(WELCOME_DOCUMENT_TITLE)
                .unwrap_or_else(|err| panic!("welcome title must validate: {err}")),
            page_contents: vec![WELCOME_PAGE_1.to_owned(), WELCOME_PAGE_2.to_owned()],
            gallery_name: GalleryName::new(WELCOME_GALLERY_NAME)
                .unwrap_or_else(|err| panic!("welcome gallery name must validate: {err}")),
            image_paths: WELCOME_IMAGE_PATHS.map(str::to_owned).to_vec(),
        }
    }
}
