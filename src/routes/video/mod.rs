mod handler;

pub use handler::{
    copy_video, create_video, delete_video, get_video, list_videos, update_video,
};
