mod main_view;
mod topbar;
