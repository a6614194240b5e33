pub mod domain;
pub mod ports;
pub mod repository;
pub mod view;

pub use domain::{new_record_id, Course, Document, DocumentKind, Note, Quiz, QuizQuestion};
pub use ports::{PortError, PortResult, QuizGeneration, RecordStore, SlideTextExtraction};
pub use repository::Repository;
pub use view::{QuizMode, ViewState};
