pub mod area;
pub mod browser;
pub mod land;
pub mod pacer;
pub mod session;
pub mod traits;
pub mod types;

pub use area::AreaCrawler;
pub use browser::ChromeDriver;
pub use land::{EndpointFetcher, FetchOutcome, FetchStatus};
pub use session::SessionBridge;
pub use traits::{BrowserCookie, BrowserDriver};
