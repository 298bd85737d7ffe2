mod articles;
mod catalog;
mod editor;
