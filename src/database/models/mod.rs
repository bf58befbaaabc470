pub mod contact;
pub mod course;
pub mod engage;
pub mod forum;
pub mod gallery;
pub mod note;
pub mod notification;
pub mod portfolio;
pub mod story;
pub mod user;

pub use contact::ContactForm;
pub use course::{
    Chapter, ChapterOutline, ChapterPreview, ChapterProgress, Course, CourseDetail, Enrollment,
    ProgressUpdate, QuizAnswers, QuizSubmission, StudentProgress,
};
pub use engage::Activity;
pub use forum::{
    ArchiveRequest, CommentBody, ForumCategory, ForumComment, ForumPost, LikeState, NewPost,
    PinRequest, PostFilter, PostSort, PostUpdate, SaveState, SavedPost, SearchQuery, TopicCount,
};
pub use gallery::{Artist, Artwork, ArtworkFilter, CategoryCount, FavoriteArtwork, FavoriteState};
pub use note::{
    AttachedNote, NewNote, NewNoteLink, Note, NoteLink, NoteSummary, NoteUpdate, PublishRequest,
};
pub use notification::{NewNotification, Notification};
pub use portfolio::{
    HighlightRequest, KudosState, NewWork, PortfolioWork, WorkFilter, WorkSort, WorkUpdate,
};
pub use story::{CeramicStory, NewStory, StoryKey, StoryUpdate};
pub use user::{ProfileUpdate, RoleUpdate, User};
