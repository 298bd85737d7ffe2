mod auth;
mod rest;
