pub mod connector;
pub mod listener;
pub mod operator;

pub use connector::{Connector, FetchedDataset};
pub use listener::ChangeListener;
pub use operator::RowOperator;
