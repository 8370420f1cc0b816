pub mod conversation;
pub mod message_dto;
pub mod message_handlers;
pub mod message_models;
pub mod message_repository;
pub mod message_service;

pub use message_handlers::{
    delete_message, get_conversations, get_thread, get_unread_count, send_message,
};
pub use message_repository::MessageRepository;
pub use message_service::MessageService;
