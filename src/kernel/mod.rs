pub mod cancel;
pub mod dispatcher;
pub mod event;
pub mod hint;
pub mod reactor;
pub mod scheduler;
pub mod state;
pub mod time;
