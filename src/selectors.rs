//! Selectors and labels for the practical-exam booking UI.
//!
//! The site is an Angular Material app; several controls only have stable
//! index-based ids (`mat-select-4`, `mat-select-6`), which is why the slot
//! engine restarts from city selection instead of retrying in place.

use crate::driver::Target;

pub const BOOKING_URL: &str = "https://my.sa.gov.ge/drivinglicenses/practicalexam";

pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 775;

// Transient modal backdrop rendered after nearly every state transition.
pub const OVERLAY_BACKDROP: &str = "div.cdk-overlay-backdrop.cdk-overlay-backdrop-showing";

// Terms dialog
pub const TERMS_CONTAINER: &str = "div[appcustomscroll]";
pub const AGREE_BUTTON_XPATH: &str = "//button[.//span[text()='ვეთანხმები']]";

// Identity form
pub const PERSONAL_NUMBER_FIELD: &str = "personalNumber";
pub const PHONE_NUMBER_FIELD: &str = "phoneNumber";
pub const SEARCH_BUTTON: &str = "img[src='assets/svg_icons/search48.svg']";
pub const CATEGORY_SELECT_ID: &str = "mat-select-value-1";

// Slot selection
pub const CITY_SELECT_XPATH: &str = "//mat-select[@name='serviceCenterId']";
pub const DATE_SELECT_ID: &str = "mat-select-4";
pub const DATE_OPTION: &str = "mat-option";
pub const TIME_SELECT_ID: &str = "mat-select-6";
pub const TIME_OPTION_XPATH: &str =
    "//div[@id='mat-select-6-panel']//span[contains(@class,'mat-option-text')]";

// The "clear selection" pseudo-option rendered at the top of every dropdown.
pub const CLEAR_OPTION_LABEL: &str = "გასუფთავება";

pub const RESERVE_BUTTON_XPATH: &str = "//button[.//span[text()='დაჯავშნა']]";
pub const INVOICE_MARKER_XPATH: &str = "//div[contains(@class,'innerTable')]//span[text()='ინვოისი']";

// Payment
pub const PAY_BUTTON_XPATH: &str =
    "//span[contains(@class,'mat-button-wrapper') and normalize-space(text())='გადახდა']";
pub const BANK_LOGO: &str = "div.description img.logoimg[src*='tbc_bank.png']";
pub const TRANS_ID_INPUT: &str = "form#cardentry input[name='trans_id']";
pub const GATEWAY_CONTINUE_URL: &str = "https://ecommerce.ufc.ge/ecomm2/ClientHandler?trans_id=";

// Option labels are substring-matched: the site decorates them with extra text.
pub fn option_with_label(fragment: &str) -> Target {
    Target::XPath(format!("//span[contains(text(),'{fragment}')]"))
}

pub fn city_option(city: &str) -> Target {
    Target::XPath(format!("//mat-option//span[contains(text(),'{city}')]"))
}
