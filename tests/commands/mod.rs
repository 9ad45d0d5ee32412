mod test_parse;
mod test_reply;
