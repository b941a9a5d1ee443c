pub mod account_recovery;
pub mod background_tasks;
pub mod email;
pub mod emi;
pub mod jwt;
pub mod payment_gateway;

pub use account_recovery::RecoveryService;
pub use background_tasks::BackgroundTaskManager;
pub use email::EmailService;
pub use jwt::{Claims, JwtService, Role};
pub use payment_gateway::GatewayClient;
